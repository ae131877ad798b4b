//! Error and result types for mapping operations.
//!
//! Use [`MapperResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors raised by the mapping layer.
///
/// The layer itself only adds serialization and lookup failures; everything
/// else is a failure reported by the underlying driver, carried in
/// [`MapperError::Backend`].
#[derive(Error, Debug)]
pub enum MapperError {
    /// Conversion between a model or field value and BSON failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Backend construction or connection setup failed.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A record with the given id already exists in the collection.
    /// The first argument is the record id, the second is the collection name.
    #[error("Record {0} already exists in collection {1}")]
    RecordAlreadyExists(String, String),
    /// The record's backing document no longer exists.
    /// The first argument is the record id, the second is the collection name.
    #[error("Record {0} not found in collection {1}")]
    RecordNotFound(String, String),
    /// The requested collection does not exist in the store.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// An error reported by the underlying driver.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for mapping operations.
pub type MapperResult<T> = Result<T, MapperError>;

impl From<BsonError> for MapperError {
    fn from(err: BsonError) -> Self {
        MapperError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for MapperError {
    fn from(err: SerdeJsonError) -> Self {
        MapperError::Serialization(err.to_string())
    }
}
