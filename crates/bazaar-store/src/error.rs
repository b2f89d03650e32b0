//! Error types for the store module.

use bazaar_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The contract handed to `put` cannot be mapped onto a sale row.
    #[error("invalid contract: {0}")]
    Contract(#[from] CoreError),

    /// Contract or transaction list could not be serialized for storage.
    #[error("encoding error: {0}")]
    Encode(String),

    /// Stored contract or transaction bytes are corrupt.
    #[error("decoding error: {0}")]
    Decode(String),

    /// No sale matches the lookup key.
    #[error("sale not found: {0}")]
    NotFound(String),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether this error means "no such sale" rather than a broken store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Classify a core error raised while reading stored bytes.
    pub(crate) fn decode(err: CoreError) -> Self {
        StoreError::Decode(err.to_string())
    }

    /// Classify a core error raised while serializing for a write.
    pub(crate) fn encode(err: CoreError) -> Self {
        match err {
            CoreError::EncodingError(msg) => StoreError::Encode(msg),
            other => StoreError::Contract(other),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
