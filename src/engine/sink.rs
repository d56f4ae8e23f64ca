//! Error sink: accumulates or raises validation failures.
//!
//! In eager mode [`ErrorSink::report`] aborts evaluation by returning a
//! [`EvalError::ValidationFailed`]; in lazy mode it records the message
//! and lets evaluation continue, so a single top-level call surfaces
//! every independent violation. Both modes must judge the same data
//! valid: handlers report through the sink and propagate the returned
//! verdict, never branching on the mode themselves.
//!
//! Warnings (advisory `format` findings under draft2019-09) accumulate
//! in both modes and never affect the verdict.

use super::errors::{EvalError, EvalResult};

/// Error-reporting mode of an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportingMode {
    /// Abort on the first validation failure.
    #[default]
    Eager,
    /// Collect all validation failures; `validate` returns `Ok(false)`.
    Lazy,
}

/// Accumulates validation failures and advisory warnings for one
/// top-level `validate` call.
#[derive(Debug)]
pub(super) struct ErrorSink {
    mode: ReportingMode,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ErrorSink {
    pub fn new(mode: ReportingMode) -> Self {
        Self {
            mode,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn mode(&self) -> ReportingMode {
        self.mode
    }

    /// Reports a validation failure.
    ///
    /// Eager mode: returns `Err(ValidationFailed)`, aborting evaluation.
    /// Lazy mode: records the message and returns `Ok(false)`.
    pub fn report(&mut self, message: impl Into<String>) -> EvalResult<bool> {
        let message = message.into();
        match self.mode {
            ReportingMode::Eager => Err(EvalError::ValidationFailed(message)),
            ReportingMode::Lazy => {
                self.errors.push(message);
                Ok(false)
            }
        }
    }

    /// Records an advisory warning. Never affects the verdict.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Clears accumulated state at the start of a top-level call.
    pub fn reset(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    /// Opens an isolated branch scope for combinator sub-evaluation.
    ///
    /// Errors recorded inside the branch are discarded when the scope is
    /// closed with [`ErrorSink::end_branch`]; only the branch's boolean
    /// outcome may influence the outer evaluation. Warnings stay.
    pub fn begin_branch(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    /// Closes an isolated branch scope, restoring the outer error list.
    pub fn end_branch(&mut self, saved: Vec<String>) {
        self.errors = saved;
    }

    /// Absorbs the errors and warnings of a nested evaluator's sink
    /// (remote `$ref` resolution).
    pub fn absorb(&mut self, other: ErrorSink) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
