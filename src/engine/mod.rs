//! Core schema-evaluation engine.
//!
//! The recursive `validate(data, schema)` walk, its per-draft keyword
//! dispatch, combinator logic, reference resolution, and the property
//! evaluation tracking behind `unevaluatedProperties`.
//!
//! # Design principles
//!
//! - Schema nodes are never mutated by validation
//! - Eager and lazy reporting judge exactly the same data valid
//! - Combinator branches are isolated: only their boolean outcome is
//!   observed, never their raised or recorded failures
//! - Schema-author mistakes are fatal faults, never validation errors
//! - Dispatch tables are instance-local, resolved once at construction

mod assertions;
mod combinators;
mod equality;
mod errors;
mod evaluator;
mod objects;
mod reference;
mod sink;

pub use errors::{EvalError, EvalResult, Severity};
pub use evaluator::Evaluator;
pub use reference::FileLoader;
pub use sink::ReportingMode;
