//! Crate-wide error type.

use thiserror::Error;

/// Failures surfaced by the storage engine and its supporting layers.
#[derive(Error, Debug)]
pub enum CubbyError {
    /// Any failure reported by the database layer.
    #[error("database error: {0}")]
    Database(String),

    /// I/O failure from the blob store or the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The target does not exist, or the requester may not see it.
    /// The two cases are deliberately indistinguishable.
    #[error("{0} not found")]
    NotFound(String),

    /// The owner's storage allowance cannot absorb the requested bytes.
    #[error("storage quota exceeded: requested {requested} bytes, {available} available")]
    QuotaExceeded { requested: i64, available: i64 },

    /// Rejected input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness conflict, e.g. a duplicate file identifier.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for CubbyError {
    fn from(e: sqlx::Error) -> Self {
        CubbyError::Database(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CubbyError>;
