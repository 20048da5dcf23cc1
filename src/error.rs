//! Error types for ivfflat.

use crate::persistence::PersistenceError;
use thiserror::Error;

/// Errors that can occur during indexing/search operations.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// A vector's length differs from the index dimensionality.
    #[error("dimension mismatch: index has {expected} dimensions, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Build or query against a dataset with no points.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Snapshot or checkpoint I/O, encoding, or format failure.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl RetrieveError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RetrieveError>;
