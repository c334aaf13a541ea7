//! Error types for the PostgreSQL sink.
//!
//! Every variant describes the failure of a single record. None of them
//! poison the destination; the caller decides whether to keep writing.

use postgresql_types::ConversionError;
use sql_builder::QueryError;
use sync_core::DecodeError;
use thiserror::Error;

/// Errors that can occur while translating or applying a change record.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Key or payload bytes are not a JSON object.
    #[error("failed to decode {part}: {source}")]
    Decode {
        part: &'static str,
        #[source]
        source: DecodeError,
    },

    /// No table could be resolved for the write.
    #[error("configuration error: {0}")]
    Config(String),

    /// The record does not carry what its action requires.
    #[error("validation error: {0}")]
    Validation(String),

    /// The record needs something this sink does not do, such as composite keys.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The statement could not be formatted.
    #[error("error formatting query: {0}")]
    Query(#[from] QueryError),

    /// An argument cannot be bound to the parameter type PostgreSQL expects.
    #[error("cannot bind argument ${position}: {source}")]
    Conversion {
        position: usize,
        #[source]
        source: ConversionError,
    },

    /// Connecting to PostgreSQL failed.
    #[error("failed to connect to postgres: {0}")]
    Connection(#[source] tokio_postgres::Error),

    /// The connection task did not shut down cleanly.
    #[error("connection task failed: {0}")]
    ConnectionTask(#[from] tokio::task::JoinError),

    /// A write was attempted before the destination was opened.
    #[error("destination is not open")]
    NotOpen,

    /// PostgreSQL rejected the statement.
    #[error("exec failed: {0}")]
    Execution(#[from] tokio_postgres::Error),

    /// The statement was cancelled before it completed.
    #[error("statement cancelled")]
    Cancelled,
}

impl SinkError {
    pub(crate) fn decode_key(source: DecodeError) -> Self {
        Self::Decode { part: "key", source }
    }

    pub(crate) fn decode_payload(source: DecodeError) -> Self {
        Self::Decode {
            part: "payload",
            source,
        }
    }
}
