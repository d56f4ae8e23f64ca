//! jscheck - A strict, draft-aware JSON Schema validation engine
//!
//! Given a parsed schema document and a parsed data value, decides whether
//! the value conforms under a selectable specification draft (4, 6, 7,
//! 2019-09). The engine consumes `serde_json::Value` trees only; parsing
//! raw text and fetching remote documents belong to external collaborators
//! (the `store` module provides a filesystem-backed one).

pub mod draft;
pub mod engine;
pub mod format;
pub mod store;
