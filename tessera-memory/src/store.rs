//! In-memory implementation of the mapper backend.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::{Bson, Document, Uuid};
use mea::rwlock::RwLock;
use tracing::debug;

use tessera_core::{
    backend::{BackendBuilder, MapperBackend},
    error::{MapperError, MapperResult},
};

use crate::matcher::matches_filter;

type CollectionMap = HashMap<Uuid, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage.
///
/// Documents are stored as BSON documents in nested hash maps behind an
/// async-aware read-write lock. The backend is cloneable; clones share the
/// same underlying data.
///
/// Finders scan the whole collection, which is fine for the development and
/// test workloads this backend is meant for. "First match" is arbitrary when
/// several documents match, as with any unordered store.
#[derive(Default, Clone, Debug)]
pub struct InMemoryBackend {
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryBackend`.
    pub fn builder() -> InMemoryBackendBuilder {
        InMemoryBackendBuilder
    }
}

#[async_trait]
impl MapperBackend for InMemoryBackend {
    async fn insert(&self, collection: &str, id: Uuid, fields: Document) -> MapperResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        if collection_map.contains_key(&id) {
            return Err(MapperError::RecordAlreadyExists(
                id.to_string(),
                collection.to_string(),
            ));
        }

        collection_map.insert(id, fields);

        Ok(())
    }

    async fn fetch(&self, collection: &str, id: Uuid) -> MapperResult<Option<Document>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .and_then(|collection_map| collection_map.get(&id))
            .cloned())
    }

    async fn read_field(
        &self,
        collection: &str,
        id: Uuid,
        field: &str,
    ) -> MapperResult<Option<Bson>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .and_then(|collection_map| collection_map.get(&id))
            .and_then(|document| document.get(field))
            .cloned())
    }

    async fn write_fields(&self, collection: &str, id: Uuid, fields: Document) -> MapperResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(MapperError::CollectionNotFound(collection.to_string())),
        };

        let document = match collection_map.get_mut(&id) {
            Some(doc) => doc,
            None => {
                return Err(MapperError::RecordNotFound(
                    id.to_string(),
                    collection.to_string(),
                ));
            }
        };

        for (field, value) in fields {
            document.insert(field, value);
        }

        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> MapperResult<Option<(Uuid, Document)>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(None),
        };

        Ok(collection_map
            .iter()
            .find(|(_, document)| matches_filter(document, &filter))
            .map(|(id, document)| (*id, document.clone())))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<usize>,
    ) -> MapperResult<Vec<(Uuid, Document)>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        Ok(collection_map
            .iter()
            .filter(|(_, document)| matches_filter(document, &filter))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, document)| (*id, document.clone()))
            .collect())
    }

    async fn upsert(
        &self,
        collection: &str,
        filter: Document,
        insert: Document,
    ) -> MapperResult<(Uuid, bool)> {
        // One write lock for the whole find-or-insert, so concurrent upserts
        // with the same filter cannot both insert.
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        if let Some((id, _)) = collection_map
            .iter()
            .find(|(_, document)| matches_filter(document, &filter))
        {
            return Ok((*id, false));
        }

        let id = Uuid::new();
        collection_map.insert(id, insert);

        debug!(collection, %id, "upsert inserted a new document");

        Ok((id, true))
    }

    async fn remove(&self, collection: &str, id: Uuid) -> MapperResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(MapperError::CollectionNotFound(collection.to_string())),
        };

        if collection_map.remove(&id).is_none() {
            return Err(MapperError::RecordNotFound(
                id.to_string(),
                collection.to_string(),
            ));
        }

        Ok(())
    }

    async fn count(&self, collection: &str, filter: Document) -> MapperResult<u64> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        Ok(collection_map
            .values()
            .filter(|document| matches_filter(document, &filter))
            .count() as u64)
    }

    async fn create_collection(&self, name: &str) -> MapperResult<()> {
        self.store
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(HashMap::new);

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> MapperResult<()> {
        let mut store = self.store.write().await;

        if store.remove(name).is_none() {
            return Err(MapperError::CollectionNotFound(name.to_string()));
        }

        debug!(collection = name, "dropped collection");

        Ok(())
    }

    async fn list_collections(&self) -> MapperResult<Vec<String>> {
        Ok(self
            .store
            .read()
            .await
            .keys()
            .cloned()
            .collect())
    }
}

/// Builder for constructing [`InMemoryBackend`] instances.
///
/// Currently a no-op builder; it exists so the in-memory backend plugs into
/// code written against [`BackendBuilder`].
#[derive(Default)]
pub struct InMemoryBackendBuilder;

#[async_trait]
impl BackendBuilder for InMemoryBackendBuilder {
    type Backend = InMemoryBackend;

    async fn build(self) -> MapperResult<Self::Backend> {
        Ok(InMemoryBackend::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn insert_then_fetch_round_trips() {
        let backend = InMemoryBackend::new();
        let id = Uuid::new();

        backend
            .insert("tickets", id, doc! { "status": "open" })
            .await
            .unwrap();

        let fetched = backend.fetch("tickets", id).await.unwrap();
        assert_eq!(fetched, Some(doc! { "status": "open" }));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let backend = InMemoryBackend::new();
        let id = Uuid::new();

        backend
            .insert("tickets", id, doc! { "status": "open" })
            .await
            .unwrap();

        let err = backend
            .insert("tickets", id, doc! { "status": "closed" })
            .await
            .unwrap_err();
        assert!(matches!(err, MapperError::RecordAlreadyExists(_, _)));
    }

    #[tokio::test]
    async fn read_field_returns_none_for_missing_field_or_record() {
        let backend = InMemoryBackend::new();
        let id = Uuid::new();

        backend
            .insert("tickets", id, doc! { "status": "open" })
            .await
            .unwrap();

        assert_eq!(
            backend.read_field("tickets", id, "status").await.unwrap(),
            Some(Bson::String("open".to_string()))
        );
        assert_eq!(backend.read_field("tickets", id, "missing").await.unwrap(), None);
        assert_eq!(
            backend
                .read_field("tickets", Uuid::new(), "status")
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn write_fields_merges_into_the_document() {
        let backend = InMemoryBackend::new();
        let id = Uuid::new();

        backend
            .insert("tickets", id, doc! { "status": "open", "priority": 1 })
            .await
            .unwrap();
        backend
            .write_fields("tickets", id, doc! { "status": "closed" })
            .await
            .unwrap();

        let fetched = backend.fetch("tickets", id).await.unwrap().unwrap();
        assert_eq!(fetched.get_str("status").unwrap(), "closed");
        assert_eq!(fetched.get_i32("priority").unwrap(), 1);
    }

    #[tokio::test]
    async fn write_fields_errors_on_missing_record() {
        let backend = InMemoryBackend::new();

        backend.create_collection("tickets").await.unwrap();

        let err = backend
            .write_fields("tickets", Uuid::new(), doc! { "status": "closed" })
            .await
            .unwrap_err();
        assert!(matches!(err, MapperError::RecordNotFound(_, _)));
    }

    #[tokio::test]
    async fn find_many_filters_and_limits() {
        let backend = InMemoryBackend::new();

        for i in 0..4 {
            backend
                .insert("tickets", Uuid::new(), doc! { "status": "open", "n": i })
                .await
                .unwrap();
        }
        backend
            .insert("tickets", Uuid::new(), doc! { "status": "closed" })
            .await
            .unwrap();

        let open = backend
            .find_many("tickets", doc! { "status": "open" }, None)
            .await
            .unwrap();
        assert_eq!(open.len(), 4);

        let capped = backend
            .find_many("tickets", doc! { "status": "open" }, Some(2))
            .await
            .unwrap();
        assert_eq!(capped.len(), 2);

        let all = backend.find_many("tickets", doc! {}, None).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn upsert_finds_before_inserting() {
        let backend = InMemoryBackend::new();

        let (first, created) = backend
            .upsert("users", doc! { "name": "alice" }, doc! { "name": "alice" })
            .await
            .unwrap();
        assert!(created);

        let (second, created) = backend
            .upsert("users", doc! { "name": "alice" }, doc! { "name": "alice" })
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(first, second);

        assert_eq!(backend.count("users", doc! {}).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_deletes_the_document() {
        let backend = InMemoryBackend::new();
        let id = Uuid::new();

        backend
            .insert("tickets", id, doc! { "status": "open" })
            .await
            .unwrap();
        backend.remove("tickets", id).await.unwrap();

        assert_eq!(backend.fetch("tickets", id).await.unwrap(), None);

        let err = backend.remove("tickets", id).await.unwrap_err();
        assert!(matches!(err, MapperError::RecordNotFound(_, _)));
    }

    #[tokio::test]
    async fn collection_admin_round_trips() {
        let backend = InMemoryBackend::new();

        backend.create_collection("a").await.unwrap();
        backend.create_collection("b").await.unwrap();

        let mut names = backend.list_collections().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);

        backend.drop_collection("a").await.unwrap();
        assert_eq!(backend.list_collections().await.unwrap(), vec!["b"]);

        let err = backend.drop_collection("a").await.unwrap_err();
        assert!(matches!(err, MapperError::CollectionNotFound(_)));
    }
}
