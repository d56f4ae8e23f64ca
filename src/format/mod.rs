//! Format Registry: pluggable mapping from format name to a checker.
//!
//! Whether a failed check is an assertion failure or an advisory warning
//! is the draft's decision, not the registry's: pre-2019 drafts assert,
//! draft2019-09 records a warning. An unregistered format name always
//! passes.

mod registry;

pub use registry::{FormatCheck, FormatRegistry};
