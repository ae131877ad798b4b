//! Class-level collection helpers.
//!
//! A [`Collection`] bundles the create/finder/upsert convenience methods for
//! one collection name. Creation persists immediately and hands back a
//! [`Record`]; the finders translate [`Criteria`] into filter documents and
//! re-attach record handles to whatever the backend returns.
//!
//! # Example
//!
//! ```ignore
//! let sessions = store.collection("sessions");
//!
//! let session = sessions.create(Criteria::new().with("user", "alice")).await?;
//! let same = sessions.find_or_create(Criteria::new().with("user", "alice")).await?;
//! assert_eq!(session.id(), same.id());
//! ```

use std::sync::Arc;

use bson::Uuid;

use crate::{
    backend::MapperBackend,
    criteria::Criteria,
    error::{MapperError, MapperResult},
    record::Record,
};

/// Create, finder, and upsert helpers bound to a single collection.
#[derive(Clone, Debug)]
pub struct Collection {
    name: String,
    backend: Arc<dyn MapperBackend>,
}

impl Collection {
    /// Creates a new collection handle (internal use).
    pub(crate) fn new(name: String, backend: Arc<dyn MapperBackend>) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a record with the given initial fields and persists it
    /// immediately.
    ///
    /// A fresh id is generated; by the time the [`Record`] is returned the
    /// insert has succeeded.
    pub async fn create(&self, fields: impl Into<Criteria>) -> MapperResult<Record> {
        let id = Uuid::new();

        self.backend
            .insert(&self.name, id, fields.into().to_fields())
            .await?;

        Ok(Record::attach(self.name.clone(), id, self.backend.clone()))
    }

    /// Re-attaches a record handle to a known document id.
    ///
    /// No lookup is performed; use [`Record::exists`] to check the document
    /// is still there.
    pub fn record(&self, id: Uuid) -> Record {
        Record::attach(self.name.clone(), id, self.backend.clone())
    }

    /// Returns records for all documents matching the criteria.
    ///
    /// Empty criteria return the whole collection, capped by the criteria
    /// limit if one was set.
    pub async fn find(&self, criteria: Criteria) -> MapperResult<Vec<Record>> {
        Ok(self
            .backend
            .find_many(&self.name, criteria.to_filter(), criteria.limit_hint())
            .await?
            .into_iter()
            .map(|(id, _)| Record::attach(self.name.clone(), id, self.backend.clone()))
            .collect())
    }

    /// Returns the first record matching the criteria, if any.
    pub async fn find_first(&self, criteria: Criteria) -> MapperResult<Option<Record>> {
        Ok(self
            .backend
            .find_one(&self.name, criteria.to_filter())
            .await?
            .map(|(id, _)| Record::attach(self.name.clone(), id, self.backend.clone())))
    }

    /// Returns the first record matching the criteria, creating one from the
    /// criteria pairs when nothing matches.
    ///
    /// An existing match is never modified. With empty criteria this returns
    /// an arbitrary record from the collection, or creates an empty document
    /// when the collection is empty.
    pub async fn find_or_create(&self, criteria: Criteria) -> MapperResult<Record> {
        let (id, _created) = self
            .backend
            .upsert(&self.name, criteria.to_filter(), criteria.to_fields())
            .await?;

        Ok(Record::attach(self.name.clone(), id, self.backend.clone()))
    }

    /// Counts the documents matching the criteria.
    pub async fn count(&self, criteria: Criteria) -> MapperResult<u64> {
        self.backend
            .count(&self.name, criteria.to_filter())
            .await
    }

    /// Deletes every document in the collection, keeping the collection
    /// itself.
    pub async fn clear(&self) -> MapperResult<()> {
        match self.backend.drop_collection(&self.name).await {
            Ok(()) | Err(MapperError::CollectionNotFound(_)) => {}
            Err(err) => return Err(err),
        }

        self.backend.create_collection(&self.name).await
    }
}
