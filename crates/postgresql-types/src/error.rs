//! Error types for binding JSON values to PostgreSQL parameters.

use thiserror::Error;

/// Errors that can occur during JSON to PostgreSQL conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The parameter type is not supported
    #[error("Unsupported PostgreSQL type: {0}")]
    UnsupportedType(String),

    /// The JSON value cannot represent the parameter type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A number does not fit the parameter type
    #[error("Value {value} out of range for {pg_type}")]
    OutOfRange { value: String, pg_type: String },

    /// Invalid UUID format
    #[error("Invalid UUID: {0}")]
    UuidError(#[from] uuid::Error),

    /// Invalid base64 for bytea
    #[error("Invalid base64: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// Invalid date, time or timestamp text
    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    /// Invalid decimal
    #[error("Invalid decimal: {0}")]
    DecimalError(String),
}
