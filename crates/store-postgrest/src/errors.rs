//! Storage-specific error types for PostgREST operations.
//!
//! This module wraps reqwest and endpoint failures and converts them to the
//! store-agnostic error types defined in `leadstream_core`.

use serde::Deserialize;
use thiserror::Error;

use leadstream_core::errors::{Error, StoreError};

/// Storage-specific errors that wrap reqwest and endpoint response types.
///
/// These errors are internal to the store layer and are converted to
/// `leadstream_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store rejected the operation: {0}")]
    Rejected(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Error body shape returned by PostgREST endpoints.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Extracts a human-readable message from a PostgREST error body, falling
/// back to the raw body text when it is not the documented JSON shape.
pub(crate) fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(parsed) => {
            let mut message = parsed
                .message
                .unwrap_or_else(|| format!("HTTP {}", status));
            if let Some(details) = parsed.details {
                message.push_str(&format!(" ({})", details));
            }
            if let Some(hint) = parsed.hint {
                message.push_str(&format!(" hint: {}", hint));
            }
            message
        }
        Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
        Err(_) => format!("HTTP {} - {}", status, body),
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Request(e) if e.is_timeout() => {
                Error::Store(StoreError::Timeout(e.to_string()))
            }
            StorageError::Request(e) if e.is_connect() || e.is_request() => {
                Error::Store(StoreError::Unreachable(e.to_string()))
            }
            StorageError::Request(e) if e.is_decode() => {
                Error::Store(StoreError::Decode(e.to_string()))
            }
            StorageError::Request(e) => Error::Store(StoreError::Unreachable(e.to_string())),
            StorageError::Rejected(message) => Error::Store(StoreError::Rejected(message)),
            StorageError::Decode(message) => Error::Store(StoreError::Decode(message)),
        }
    }
}
