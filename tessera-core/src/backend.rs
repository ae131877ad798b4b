//! Driver abstraction the mapping layer forwards to.
//!
//! The [`MapperBackend`] trait captures the handful of insert/find/update
//! primitives every operation in this crate reduces to. Implementations wrap
//! a concrete driver (in-memory, MongoDB, ...) and are selected at runtime:
//! record and collection handles hold an `Arc<dyn MapperBackend>`, so the
//! trait is object-safe by design.
//!
//! # Thread Safety
//!
//! All implementations must be thread-safe and support concurrent access from
//! multiple async tasks. The concurrency model is implementation-specific.
//!
//! # Error Handling
//!
//! Operations return [`MapperResult<T>`](crate::error::MapperResult).
//! Driver-level failures are mapped into
//! [`MapperError::Backend`](crate::error::MapperError::Backend).

use async_trait::async_trait;
use bson::{Bson, Document, Uuid};
use std::fmt::Debug;

use crate::error::MapperResult;

/// Abstract interface over a document database driver.
///
/// Filter documents are plain key/value equality maps produced by
/// [`Criteria::to_filter`](crate::criteria::Criteria::to_filter); an empty
/// filter matches every document in the collection. Implementations delegate
/// matching to the driver and must not reinterpret filters.
#[async_trait]
pub trait MapperBackend: Send + Sync + Debug {
    /// Inserts a new document into a collection.
    ///
    /// The collection is created automatically if it doesn't exist. Inserting
    /// an id that is already present is an error
    /// ([`RecordAlreadyExists`](crate::error::MapperError::RecordAlreadyExists)
    /// or a driver-reported duplicate-key failure).
    async fn insert(&self, collection: &str, id: Uuid, fields: Document) -> MapperResult<()>;

    /// Retrieves a whole document by id, or `None` when it doesn't exist.
    async fn fetch(&self, collection: &str, id: Uuid) -> MapperResult<Option<Document>>;

    /// Reads a single field of a document.
    ///
    /// Returns `Ok(None)` both when the field is absent and when the document
    /// itself is gone; callers that need to distinguish use [`Self::fetch`].
    async fn read_field(
        &self,
        collection: &str,
        id: Uuid,
        field: &str,
    ) -> MapperResult<Option<Bson>>;

    /// Writes the given fields of a document, leaving other fields untouched.
    ///
    /// Returns [`RecordNotFound`](crate::error::MapperError::RecordNotFound)
    /// when the document doesn't exist.
    async fn write_fields(&self, collection: &str, id: Uuid, fields: Document) -> MapperResult<()>;

    /// Returns the first document matching the filter, with its id.
    ///
    /// Which document is "first" is backend-specific when several match.
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> MapperResult<Option<(Uuid, Document)>>;

    /// Returns all documents matching the filter, up to `limit` if given.
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<usize>,
    ) -> MapperResult<Vec<(Uuid, Document)>>;

    /// Returns the id of the first document matching the filter, inserting
    /// `insert` under a fresh id when nothing matches.
    ///
    /// The boolean is `true` when a document was created. An existing match
    /// is never modified.
    async fn upsert(
        &self,
        collection: &str,
        filter: Document,
        insert: Document,
    ) -> MapperResult<(Uuid, bool)>;

    /// Deletes a document by id.
    ///
    /// Returns [`RecordNotFound`](crate::error::MapperError::RecordNotFound)
    /// when the document doesn't exist.
    async fn remove(&self, collection: &str, id: Uuid) -> MapperResult<()>;

    /// Counts the documents matching the filter. A missing collection counts
    /// as zero.
    async fn count(&self, collection: &str, filter: Document) -> MapperResult<u64>;

    /// Creates an empty collection with the given name.
    async fn create_collection(&self, name: &str) -> MapperResult<()>;

    /// Drops a collection and all its documents.
    async fn drop_collection(&self, name: &str) -> MapperResult<()>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> MapperResult<Vec<String>>;

    /// Cleanly releases backend resources.
    ///
    /// The default implementation is a no-op; backends with external
    /// connections should override this.
    async fn shutdown(&self) -> MapperResult<()> {
        Ok(())
    }
}

/// Factory trait for constructing backend instances.
#[async_trait]
pub trait BackendBuilder {
    type Backend: MapperBackend + 'static;

    async fn build(self) -> MapperResult<Self::Backend>;
}
