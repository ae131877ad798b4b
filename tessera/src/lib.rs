//! Main tessera crate providing a unified interface for object-document
//! mapping.
//!
//! This crate is the primary entry point for users of the tessera mapping
//! layer. It re-exports the core types from the sub-crates and provides
//! convenient access to the storage backends.
//!
//! The layer is deliberately thin: records are persisted on creation, field
//! access is forwarded straight to the backing document through a backend
//! trait object, and the finder/upsert helpers translate key/value criteria
//! into filter documents for the driver. Storage, indexing, and consistency
//! all belong to the database underneath.
//!
//! # Quick Start
//!
//! ```ignore
//! use tessera::{prelude::*, memory::InMemoryBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Store::new(InMemoryBackend::new());
//!     let tickets = store.collection("tickets");
//!
//!     // Creating a record persists it immediately.
//!     let ticket = tickets
//!         .create(Criteria::new().with("status", "open"))
//!         .await
//!         .unwrap();
//!
//!     // Reads and writes go straight to the stored document.
//!     ticket.set("assignee", "alice").await.unwrap();
//!     let status = ticket.get("status").await.unwrap();
//!     println!("status: {:?}", status);
//!
//!     // Finder and upsert helpers work from key/value criteria.
//!     let open = tickets
//!         .find(Criteria::new().with("status", "open"))
//!         .await
//!         .unwrap();
//!     let same = tickets
//!         .find_or_create(Criteria::new().with("status", "open"))
//!         .await
//!         .unwrap();
//!     assert_eq!(same.id(), ticket.id());
//!     assert_eq!(open.len(), 1);
//! }
//! ```
//!
//! # Typed Models
//!
//! Serde-backed structs can be bound to a collection with the [`Model`]
//! derive:
//!
//! ```ignore
//! use tessera::{prelude::*, memory::InMemoryBackend};
//! use tessera::bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Model)]
//! pub struct User {
//!     pub id: Uuid,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Store::new(InMemoryBackend::new());
//!     let users = store.model::<User>();
//!
//!     let alice = User { id: Uuid::new(), name: "Alice".to_string() };
//!     users.save(&alice).await.unwrap();
//!
//!     let found = users
//!         .find_first(Criteria::new().with("name", "Alice"))
//!         .await
//!         .unwrap();
//!     assert_eq!(found.map(|user| user.id), Some(alice.id));
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use tessera_core::{backend, collection, criteria, error, model, record, store};

pub use tessera_core::model::Model;
pub use tessera_macros::Model;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use tessera_memory::{InMemoryBackend, InMemoryBackendBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use tessera_mongodb::{MongoBackend, MongoBackendBuilder};
}
