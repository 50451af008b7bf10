//! Error types for the shared-bitmap Bloom filter

use thiserror::Error;

use crate::domain::ScriptKind;

/// Errors surfaced to callers of `exist` / `set`
#[derive(Debug, Error)]
pub enum FilterError {
    /// The store could not be reached (connection, IO, protocol)
    #[error("Store transport error: {0}")]
    StoreTransport(String),

    /// The atomic script failed while reading or writing a bit
    #[error("Script execution error: {0}")]
    ScriptExecution(String),

    /// The store answered with a code outside the contracted domain
    #[error("Unexpected {script} result: {value}")]
    UnexpectedResult { script: ScriptKind, value: i64 },

    /// The store call did not finish within the configured deadline
    #[error("Store call timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("Invalid bitmap key: {0}")]
    InvalidKey(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
}

impl FilterError {
    /// True for failures that happened on the way to the store rather than inside it
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FilterError::StoreTransport(_) | FilterError::Timeout { .. }
        )
    }
}

/// Errors reported by a `BitVectorStore` implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Transport: {0}")]
    Transport(String),

    #[error("Script: {0}")]
    Script(String),
}

impl From<StoreError> for FilterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Transport(msg) => FilterError::StoreTransport(msg),
            StoreError::Script(msg) => FilterError::ScriptExecution(msg),
        }
    }
}

/// Failure of the pluggable encode capability
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct EncodeError(pub String);
