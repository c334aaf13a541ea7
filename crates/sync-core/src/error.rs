//! Error types for decoding change record bytes.

use thiserror::Error;

/// Errors that can occur while decoding key or payload bytes.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The bytes are valid JSON, but the top-level value is not an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}
