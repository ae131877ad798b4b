//! Typed model binding for serde-backed structs.
//!
//! Where [`Record`](crate::record::Record) works field by field against a
//! schemaless document, a [`Model`] is a plain struct serialized as a whole.
//! The `id` travels inside the fields document under its own key and doubles
//! as the backend document id, so typed and untyped access to the same
//! collection stay consistent.
//!
//! # Deriving
//!
//! The `tessera` facade ships a `#[derive(Model)]` macro; by hand the impl is:
//!
//! ```ignore
//! use tessera::Model;
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     pub id: Uuid,
//!     pub name: String,
//! }
//!
//! impl Model for User {
//!     fn id(&self) -> &Uuid {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "users"
//!     }
//! }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use bson::{Bson, Document, Uuid, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    backend::MapperBackend,
    criteria::Criteria,
    error::{MapperError, MapperResult},
    record::Record,
};

/// A serde-backed struct stored as a document in a fixed collection.
pub trait Model:
    Serialize + DeserializeOwned + Send + Sync + Clone + 'static
{
    /// Returns a reference to this model's unique identifier.
    fn id(&self) -> &Uuid;

    /// Returns the name of the collection instances of this model live in.
    fn collection_name() -> &'static str;
}

/// Serialization helpers automatically implemented for every [`Model`].
pub trait ModelExt: Model {
    /// Serializes this model into a fields document.
    fn to_fields(&self) -> MapperResult<Document>;

    /// Deserializes a model from a fields document.
    fn from_fields(fields: Document) -> MapperResult<Self>;
}

impl<M: Model> ModelExt for M {
    fn to_fields(&self) -> MapperResult<Document> {
        match serialize_to_bson(self)? {
            Bson::Document(fields) => Ok(fields),
            other => Err(MapperError::Serialization(format!(
                "model serialized to {:?} instead of a document",
                other.element_type()
            ))),
        }
    }

    fn from_fields(fields: Document) -> MapperResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(fields))?)
    }
}

/// Typed collection handle for a specific model type.
#[derive(Clone, Debug)]
pub struct ModelCollection<M: Model> {
    name: String,
    backend: Arc<dyn MapperBackend>,
    _marker: PhantomData<M>,
}

impl<M: Model> ModelCollection<M> {
    /// Creates a new typed collection handle (internal use).
    pub(crate) fn new(backend: Arc<dyn MapperBackend>) -> Self {
        Self {
            name: M::collection_name().to_string(),
            backend,
            _marker: PhantomData,
        }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persists a new model instance, returning an untyped [`Record`] handle
    /// to the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordAlreadyExists`](MapperError::RecordAlreadyExists) when
    /// a document with the model's id is already stored.
    pub async fn save(&self, model: &M) -> MapperResult<Record> {
        let id = *model.id();

        self.backend
            .insert(&self.name, id, model.to_fields()?)
            .await?;

        Ok(Record::attach(self.name.clone(), id, self.backend.clone()))
    }

    /// Retrieves a model by id, or `None` when it doesn't exist.
    pub async fn fetch(&self, id: Uuid) -> MapperResult<Option<M>> {
        match self.backend.fetch(&self.name, id).await? {
            Some(fields) => Ok(Some(M::from_fields(fields)?)),
            None => Ok(None),
        }
    }

    /// Writes the model's current fields over the stored document.
    pub async fn update(&self, model: &M) -> MapperResult<()> {
        self.backend
            .write_fields(&self.name, *model.id(), model.to_fields()?)
            .await
    }

    /// Returns all models matching the criteria.
    pub async fn find(&self, criteria: Criteria) -> MapperResult<Vec<M>> {
        self.backend
            .find_many(&self.name, criteria.to_filter(), criteria.limit_hint())
            .await?
            .into_iter()
            .map(|(_, fields)| M::from_fields(fields))
            .collect()
    }

    /// Returns the first model matching the criteria, if any.
    pub async fn find_first(&self, criteria: Criteria) -> MapperResult<Option<M>> {
        match self
            .backend
            .find_one(&self.name, criteria.to_filter())
            .await?
        {
            Some((_, fields)) => Ok(Some(M::from_fields(fields)?)),
            None => Ok(None),
        }
    }

    /// Returns the first model matching the criteria, persisting `candidate`
    /// when nothing matches.
    ///
    /// Unlike the untyped
    /// [`Collection::find_or_create`](crate::collection::Collection::find_or_create)
    /// this is a find-then-insert composition, not a single backend upsert:
    /// the candidate carries its own id, which a backend-generated upsert id
    /// would contradict.
    pub async fn find_or_insert(&self, criteria: Criteria, candidate: M) -> MapperResult<M> {
        if let Some(found) = self.find_first(criteria).await? {
            return Ok(found);
        }

        self.save(&candidate).await?;

        Ok(candidate)
    }

    /// Deletes a stored model by id.
    pub async fn delete(&self, id: Uuid) -> MapperResult<()> {
        self.backend.remove(&self.name, id).await
    }
}
