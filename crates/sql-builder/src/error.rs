//! Error types for query formatting.

use thiserror::Error;

/// Errors that can occur while formatting a statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No table name was given.
    #[error("statement requires a table name")]
    MissingTable,

    /// An INSERT needs at least one column.
    #[error("insert into '{0}' requires at least one column")]
    NoColumns(String),

    /// No key column was given for an UPSERT or DELETE.
    #[error("statement on '{0}' requires a key column")]
    MissingKeyColumn(String),

    /// Column and value lists are not index-aligned.
    #[error("column count {columns} does not match value count {values}")]
    LengthMismatch { columns: usize, values: usize },

    /// A placeholder could not be written.
    #[error("failed to write placeholder: {0}")]
    Format(#[from] std::fmt::Error),
}
