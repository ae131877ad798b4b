use async_trait::async_trait;
use bson::{Bson, Document, Uuid, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions},
};
use tracing::debug;

use tessera_core::{
    backend::{BackendBuilder, MapperBackend},
    error::{MapperError, MapperResult},
};

use crate::sanitizer::{escape_document, escape_key, unescape_document, unescape_key, unescape_value};

/// MongoDB-backed implementation of the mapper backend.
///
/// Documents carry their mapper id as a UUID `_id`; everything else is the
/// fields document with escaped keys (see [`crate::sanitizer`]).
#[derive(Debug)]
pub struct MongoBackend {
    client: Client,
    database: String,
}

impl MongoBackend {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoBackendBuilder {
        MongoBackendBuilder::new(dsn, database)
    }

    fn handle(&self, collection: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&escape_key(collection))
    }

    fn outgoing(&self, id: Uuid, fields: &Document) -> Document {
        let mut document = escape_document(fields);
        document.insert("_id", id);
        document
    }

    fn incoming(&self, mut document: Document) -> MapperResult<(Uuid, Document)> {
        let id = match document.remove("_id") {
            Some(Bson::Binary(binary)) => binary
                .to_uuid()
                .map_err(|e| MapperError::Backend(e.to_string()))?,
            _ => {
                return Err(MapperError::Backend(
                    "stored document is missing a UUID _id".to_string(),
                ));
            }
        };

        Ok((id, unescape_document(&document)))
    }
}

#[async_trait]
impl MapperBackend for MongoBackend {
    async fn insert(&self, collection: &str, id: Uuid, fields: Document) -> MapperResult<()> {
        self.handle(collection)
            .insert_one(self.outgoing(id, &fields))
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn fetch(&self, collection: &str, id: Uuid) -> MapperResult<Option<Document>> {
        self.handle(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?
            .map(|document| self.incoming(document))
            .transpose()
            .map(|found| found.map(|(_, fields)| fields))
    }

    async fn read_field(
        &self,
        collection: &str,
        id: Uuid,
        field: &str,
    ) -> MapperResult<Option<Bson>> {
        let key = escape_key(field);

        Ok(self
            .handle(collection)
            .find_one(doc! { "_id": id })
            .projection(doc! { &key: 1, "_id": 0 })
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?
            .and_then(|document| document.get(&key).cloned())
            .map(|value| unescape_value(&value)))
    }

    async fn write_fields(&self, collection: &str, id: Uuid, fields: Document) -> MapperResult<()> {
        let result = self
            .handle(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": escape_document(&fields) })
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(MapperError::RecordNotFound(
                id.to_string(),
                collection.to_string(),
            ));
        }

        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> MapperResult<Option<(Uuid, Document)>> {
        self.handle(collection)
            .find_one(escape_document(&filter))
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?
            .map(|document| self.incoming(document))
            .transpose()
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<usize>,
    ) -> MapperResult<Vec<(Uuid, Document)>> {
        let mut options = FindOptions::default();
        if let Some(limit) = limit {
            options.limit = Some(limit as i64);
        }

        self.handle(collection)
            .find(escape_document(&filter))
            .with_options(options)
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?
            .into_iter()
            .map(|document| self.incoming(document))
            .collect()
    }

    async fn upsert(
        &self,
        collection: &str,
        filter: Document,
        insert: Document,
    ) -> MapperResult<(Uuid, bool)> {
        // $setOnInsert leaves an existing match untouched; the fresh _id only
        // lands when the server takes the insert path.
        let mut insert_fields = escape_document(&insert);
        insert_fields.insert("_id", Uuid::new());

        let result = self
            .handle(collection)
            .update_one(
                escape_document(&filter),
                doc! { "$setOnInsert": insert_fields },
            )
            .upsert(true)
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?;

        match result.upserted_id {
            Some(Bson::Binary(binary)) => {
                let id = binary
                    .to_uuid()
                    .map_err(|e| MapperError::Backend(e.to_string()))?;

                debug!(collection, %id, "upsert inserted a new document");

                Ok((id, true))
            }
            Some(other) => Err(MapperError::Backend(format!(
                "upsert produced a non-UUID _id: {other}"
            ))),
            None => match self.find_one(collection, filter).await? {
                Some((id, _)) => Ok((id, false)),
                None => Err(MapperError::Backend(
                    "upsert matched a document that has since disappeared".to_string(),
                )),
            },
        }
    }

    async fn remove(&self, collection: &str, id: Uuid) -> MapperResult<()> {
        let result = self
            .handle(collection)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?;

        if result.deleted_count == 0 {
            return Err(MapperError::RecordNotFound(
                id.to_string(),
                collection.to_string(),
            ));
        }

        Ok(())
    }

    async fn count(&self, collection: &str, filter: Document) -> MapperResult<u64> {
        self.handle(collection)
            .count_documents(escape_document(&filter))
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))
    }

    async fn create_collection(&self, name: &str) -> MapperResult<()> {
        self.client
            .database(&self.database)
            .create_collection(escape_key(name))
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> MapperResult<()> {
        self.handle(name)
            .drop()
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_collections(&self) -> MapperResult<Vec<String>> {
        Ok(self
            .client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(|e| MapperError::Backend(e.to_string()))?
            .into_iter()
            .map(|name| unescape_key(&name))
            .collect())
    }

    async fn shutdown(&self) -> MapperResult<()> {
        debug!(database = %self.database, "shutting down mongodb client");

        self.client.clone().shutdown().await;

        Ok(())
    }
}

pub struct MongoBackendBuilder {
    dsn: String,
    database: String,
}

impl MongoBackendBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl BackendBuilder for MongoBackendBuilder {
    type Backend = MongoBackend;

    async fn build(self) -> MapperResult<Self::Backend> {
        Ok(MongoBackend::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| MapperError::Initialization(e.to_string()))?,
            )
            .map_err(|e| MapperError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
