//! MongoDB backend for the tessera mapping layer.
//!
//! This crate implements the `MapperBackend` trait on top of the official
//! MongoDB driver. Documents are keyed by a UUID `_id`, field updates use
//! `$set`, and the find-or-create helper maps onto a native upsert so it is
//! atomic on the server.
//!
//! To use this backend, enable the `mongodb` feature of the facade crate:
//!
//! ```toml
//! [dependencies]
//! tessera = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tessera::{prelude::*, mongodb::MongoBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::open(
//!         MongoBackend::builder("mongodb://localhost:27017", "my_database"),
//!     )
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as tessera_mongodb;

pub mod sanitizer;
pub mod store;

pub use store::{MongoBackend, MongoBackendBuilder};
