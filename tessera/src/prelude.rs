//! Convenient re-exports of commonly used types from tessera.
//!
//! ```ignore
//! use tessera::prelude::*;
//! ```

pub use tessera_core::{
    backend::{BackendBuilder, MapperBackend},
    collection::Collection,
    criteria::Criteria,
    error::{MapperError, MapperResult},
    model::{Model, ModelCollection, ModelExt},
    record::Record,
    store::Store,
};

pub use tessera_macros::Model;
