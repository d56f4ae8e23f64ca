//! Filesystem-backed schema document store.
//!
//! An external collaborator for the engine's remote-loader seam: maps a
//! `$ref` URI to a JSON document under a root directory, parses it once,
//! and caches the parsed tree. Convertible into the [`FileLoader`]
//! callback the evaluator consumes.
//!
//! [`FileLoader`]: crate::engine::FileLoader

mod errors;
mod store;

pub use errors::{StoreError, StoreResult};
pub use store::DocumentStore;
