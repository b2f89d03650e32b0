//! Error types for Bazaar Core.

use thiserror::Error;

/// Errors raised while inspecting or (de)serializing core documents.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A nested field the caller relies on is absent.
    #[error("contract is missing {0}")]
    MissingField(&'static str),

    /// Payment amount does not fit the signed integer range used for storage.
    #[error("payment amount {0} is out of range")]
    AmountOutOfRange(u64),

    /// Integer does not name a known order state.
    #[error("unknown order state: {0}")]
    UnknownOrderState(i64),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
