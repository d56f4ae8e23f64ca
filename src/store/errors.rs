//! Document store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Faults raised while loading schema documents from disk.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the document file failed.
    #[error("failed to read schema document '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document file is not valid JSON.
    #[error("malformed schema document '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The URI escapes the store's root directory.
    #[error("schema URI '{uri}' resolves outside the document root")]
    OutsideRoot { uri: String },
}
