//! Procedural macros for the tessera mapping layer.
//!
//! Currently this is a single derive macro implementing the `Model` trait
//! for serde-backed structs.

#[allow(unused_extern_crates)]
extern crate self as tessera_macros;

use proc_macro::TokenStream;

mod model_derive;

/// Derive macro implementing `tessera::Model` for a struct.
///
/// The collection name defaults to the lowercased struct name with an `s`
/// suffix and can be overridden with `#[model(collection = "..")]`. The
/// document id is taken from the field named `id` unless another field is
/// tagged `#[model(id)]`.
///
/// # Example
///
/// ```ignore
/// use tessera::prelude::*;
/// use tessera::bson::Uuid;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Model)]
/// #[model(collection = "accounts")]
/// pub struct Account {
///     pub id: Uuid,
///     pub owner: String,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model_derive::expand(input)
}
