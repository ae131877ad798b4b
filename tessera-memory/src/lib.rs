//! In-memory backend for the tessera mapping layer.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `MapperBackend` trait. Documents live in nested hash maps behind an
//! async-aware read-write lock; it is intended for development, testing,
//! and small-scale use.
//!
//! # Quick Start
//!
//! ```ignore
//! use tessera::{prelude::*, memory::InMemoryBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::new(InMemoryBackend::new());
//!     let tickets = store.collection("tickets");
//!
//!     let ticket = tickets.create(Criteria::new().with("status", "open")).await?;
//!     ticket.set("assignee", "alice").await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as tessera_memory;

pub mod matcher;
pub mod store;

pub use store::{InMemoryBackend, InMemoryBackendBuilder};
