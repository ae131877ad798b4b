//! A lightweight object-document mapping layer over document databases.
//!
//! This crate is the core of the tessera project and provides:
//!
//! - **Backend abstraction** ([`backend`]) - The driver primitives the mapper forwards to
//! - **Criteria building** ([`criteria`]) - Key/value pairs translated into filter documents
//! - **Record handles** ([`record`]) - Auto-persisted handles forwarding field access to the store
//! - **Collection helpers** ([`collection`]) - Class-level create/finder/upsert convenience
//! - **Typed models** ([`model`]) - Serde-backed structs bound to collections
//! - **Store entry point** ([`store`]) - Hands out collections over a shared backend
//! - **Error handling** ([`error`]) - Error and result types
//!
//! The layer owns no storage, indexing, or consistency logic of its own; every
//! operation is a thin pass-through to the configured [`backend::MapperBackend`].
//!
//! # Example
//!
//! ```ignore
//! use tessera::{prelude::*, memory::InMemoryBackend};
//!
//! let store = Store::new(InMemoryBackend::new());
//! let tickets = store.collection("tickets");
//!
//! // Creating a record persists it immediately.
//! let ticket = tickets.create(Criteria::new().with("status", "open")).await?;
//!
//! // Field access round-trips through the backend.
//! ticket.set("assignee", "alice").await?;
//! let status = ticket.get("status").await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as tessera_core;

pub mod backend;
pub mod collection;
pub mod criteria;
pub mod error;
pub mod model;
pub mod record;
pub mod store;
