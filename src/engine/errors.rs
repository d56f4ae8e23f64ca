//! Evaluator fault taxonomy.
//!
//! Two fault kinds exist:
//!
//! - **Schema-invalid**: the schema itself is malformed for a keyword it
//!   declares. Always fatal, in both reporting modes, and never converted
//!   into a recorded validation error: it is the schema author's
//!   mistake, not the data's.
//! - **Validation failure**: the data does not satisfy a keyword. In
//!   eager mode the first failure aborts the `validate` call as
//!   [`EvalError::ValidationFailed`]; in lazy mode failures accumulate in
//!   the error sink and no `ValidationFailed` is ever returned.
//!
//! A missing remote loader when one is required is a fatal configuration
//! fault, reported immediately and never retried.

use thiserror::Error;

/// Result type for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Severity of an evaluator fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The data was judged invalid; the evaluator remains usable.
    Reject,
    /// Schema author or configuration mistake; validation cannot proceed.
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Faults raised during schema evaluation.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// The schema is malformed for a keyword it declares.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Eager-mode validation failure (first failing keyword).
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// A remote `$ref` was encountered but no file loader is registered.
    #[error("unable to load '{uri}' because no file loader was set")]
    FileLoaderMissing { uri: String },

    /// The registered file loader failed to produce a remote document.
    #[error("unable to load remote schema '{uri}': {reason}")]
    RemoteLoadFailed { uri: String, reason: String },
}

impl EvalError {
    /// Returns the severity of this fault.
    pub fn severity(&self) -> Severity {
        match self {
            EvalError::ValidationFailed(_) => Severity::Reject,
            _ => Severity::Fatal,
        }
    }

    /// Returns whether this fault is fatal (schema or configuration
    /// mistake rather than invalid data).
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
