//! Core error types for the Leadstream application.
//!
//! This module defines store-agnostic error types. Transport-specific
//! failures (from reqwest, the PostgREST endpoint, etc.) are converted to
//! these types by the store layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the lead ingestion application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Store-agnostic error type for gateway operations.
///
/// This enum uses `String` for all error details, allowing the store layer
/// to convert transport-specific errors into this format.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request never reached the store (connect failure, DNS, TLS).
    #[error("Failed to reach store: {0}")]
    Unreachable(String),

    /// The store answered but rejected the operation.
    #[error("Store rejected the operation: {0}")]
    Rejected(String),

    /// The store's response could not be decoded.
    #[error("Failed to decode store response: {0}")]
    Decode(String),

    /// The request timed out.
    #[error("Store request timed out: {0}")]
    Timeout(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
