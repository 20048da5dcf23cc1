//! Error types for persistence operations.

use thiserror::Error;

/// Errors that can occur while saving or loading index state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error (file operations, disk I/O)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally invalid persisted state (missing or mismatched fields, bad magic)
    #[error("format error: {0}")]
    Format(String),

    /// Encoding failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Decoding failed
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Binary snapshot written by an incompatible format version
    #[error("unsupported format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl From<postcard::Error> for PersistenceError {
    fn from(e: postcard::Error) -> Self {
        Self::Deserialization(format!("postcard error: {e}"))
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Deserialization(format!("json error: {e}"))
    }
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
