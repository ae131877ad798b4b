//! Store entry point handing out collection handles.
//!
//! A [`Store`] owns the shared backend trait object. Collection and model
//! handles cloned off it all talk to the same backend.

use std::sync::Arc;

use tracing::debug;

use crate::{
    backend::{BackendBuilder, MapperBackend},
    collection::Collection,
    error::MapperResult,
    model::{Model, ModelCollection},
};

/// The main interface for working with a mapped document database.
///
/// # Example
///
/// ```ignore
/// let store = Store::new(InMemoryBackend::new());
/// let tickets = store.collection("tickets");
/// let users = store.model::<User>();
/// ```
#[derive(Clone, Debug)]
pub struct Store {
    backend: Arc<dyn MapperBackend>,
}

impl Store {
    /// Creates a store over the given backend.
    pub fn new(backend: impl MapperBackend + 'static) -> Self {
        Self { backend: Arc::new(backend) }
    }

    /// Creates a store over an already-shared backend handle.
    pub fn from_arc(backend: Arc<dyn MapperBackend>) -> Self {
        Self { backend }
    }

    /// Builds a backend with the given builder and wraps it in a store.
    pub async fn open<B: BackendBuilder>(builder: B) -> MapperResult<Self> {
        Ok(Self::new(builder.build().await?))
    }

    /// Returns an untyped collection handle with the given name.
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(name.to_string(), self.backend.clone())
    }

    /// Returns a typed collection handle for the given model type.
    ///
    /// The collection name comes from [`Model::collection_name`].
    pub fn model<M: Model>(&self) -> ModelCollection<M> {
        ModelCollection::new(self.backend.clone())
    }

    /// Creates a new collection with the given name.
    pub async fn create_collection(&self, name: &str) -> MapperResult<()> {
        self.backend.create_collection(name).await
    }

    /// Drops a collection and all its documents.
    pub async fn drop_collection(&self, name: &str) -> MapperResult<()> {
        self.backend.drop_collection(name).await
    }

    /// Lists all collections in the store.
    pub async fn list_collections(&self) -> MapperResult<Vec<String>> {
        self.backend.list_collections().await
    }

    /// Shuts down the backend, releasing its resources.
    ///
    /// Other clones of this store share the same backend and must not be
    /// used afterwards.
    pub async fn shutdown(&self) -> MapperResult<()> {
        debug!("shutting down store backend");

        self.backend.shutdown().await
    }
}
