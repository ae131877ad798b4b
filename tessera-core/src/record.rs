//! Auto-persisted record handles.
//!
//! A [`Record`] wraps nothing but a collection name, a document id, and a
//! backend trait object. Every field read or write round-trips through the
//! backend; the handle caches no state, so two handles to the same id always
//! observe each other's writes.

use std::sync::Arc;

use bson::{Bson, Document, Uuid, de::deserialize_from_bson};
use serde::de::DeserializeOwned;

use crate::{
    backend::MapperBackend,
    error::{MapperError, MapperResult},
};

/// A handle to one persisted document.
///
/// Records are obtained from [`Collection::create`](crate::collection::Collection::create)
/// (which persists the document before the handle is returned) or from the
/// finder helpers. Cloning a record clones the handle, not the document.
#[derive(Clone, Debug)]
pub struct Record {
    collection: String,
    id: Uuid,
    backend: Arc<dyn MapperBackend>,
}

impl Record {
    /// Attaches a handle to an existing document id (internal use).
    pub(crate) fn attach(collection: String, id: Uuid, backend: Arc<dyn MapperBackend>) -> Self {
        Self { collection, id, backend }
    }

    /// Returns the id of the backing document.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the name of the collection this record lives in.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Reads a single field from the backing document.
    ///
    /// Returns `Ok(None)` when the field is absent, including when the whole
    /// document has been deleted; use [`Record::load`] or [`Record::exists`]
    /// to tell the two apart.
    pub async fn get(&self, field: &str) -> MapperResult<Option<Bson>> {
        self.backend
            .read_field(&self.collection, self.id, field)
            .await
    }

    /// Reads a single field and deserializes it into `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`Serialization`](MapperError::Serialization) error when the
    /// stored value does not deserialize into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, field: &str) -> MapperResult<Option<T>> {
        match self.get(field).await? {
            Some(value) => Ok(Some(deserialize_from_bson(value)?)),
            None => Ok(None),
        }
    }

    /// Writes a single field of the backing document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordNotFound`](MapperError::RecordNotFound) when the
    /// document has been deleted.
    pub async fn set(&self, field: impl Into<String>, value: impl Into<Bson>) -> MapperResult<()> {
        let mut fields = Document::new();
        fields.insert(field.into(), value.into());

        self.backend
            .write_fields(&self.collection, self.id, fields)
            .await
    }

    /// Writes several fields at once, leaving other fields untouched.
    pub async fn set_many(&self, fields: Document) -> MapperResult<()> {
        self.backend
            .write_fields(&self.collection, self.id, fields)
            .await
    }

    /// Returns a snapshot of the whole backing document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordNotFound`](MapperError::RecordNotFound) when the
    /// document has been deleted since this handle was obtained.
    pub async fn load(&self) -> MapperResult<Document> {
        self.backend
            .fetch(&self.collection, self.id)
            .await?
            .ok_or_else(|| {
                MapperError::RecordNotFound(self.id.to_string(), self.collection.clone())
            })
    }

    /// Returns `true` while the backing document exists.
    pub async fn exists(&self) -> MapperResult<bool> {
        Ok(self
            .backend
            .fetch(&self.collection, self.id)
            .await?
            .is_some())
    }

    /// Deletes the backing document, consuming the handle.
    pub async fn delete(self) -> MapperResult<()> {
        self.backend
            .remove(&self.collection, self.id)
            .await
    }
}
