//! Action routing and statement translation.
//!
//! Routing is single-shot per record. Nothing is remembered between records
//! except the read-only [`Config`].
//!
//! | action | key | key column configured | route |
//! |---|---|---|---|
//! | insert / unspecified | no | - | INSERT |
//! | insert / unspecified | yes | no | INSERT |
//! | insert / unspecified | yes | yes | UPSERT |
//! | update | no | - | validation error |
//! | update | yes | - | UPSERT |
//! | delete | no | - | validation error |
//! | delete | yes | - | DELETE |

use crate::config::Config;
use crate::error::SinkError;
use crate::resolve::{resolve_key_column_name, resolve_table_name};
use sql_builder::{merge, ColumnValues, Placeholder, PlaceholderFormat, QueryFormatter, Statement};
use std::fmt;
use sync_core::{Action, ChangeRecord, StructuredData};
use tracing::debug;

/// The write path chosen for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Append-only INSERT with no conflict handling.
    Insert,
    /// INSERT ... ON CONFLICT (key) DO UPDATE.
    Upsert,
    Delete,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Insert => write!(f, "insert"),
            Route::Upsert => write!(f, "upsert"),
            Route::Delete => write!(f, "delete"),
        }
    }
}

/// Pick the write path for an action.
///
/// Unspecified actions are inserts. A plain INSERT is used whenever there is
/// no key or no configured key column, so duplicate keys surface as
/// execution errors rather than being merged.
pub fn route(action: Action, has_key: bool, key_column_configured: bool) -> Result<Route, SinkError> {
    match action {
        Action::Insert | Action::Unspecified => {
            if has_key && key_column_configured {
                Ok(Route::Upsert)
            } else {
                Ok(Route::Insert)
            }
        }
        Action::Update if has_key => Ok(Route::Upsert),
        Action::Update => Err(SinkError::Validation(
            "key required for update".to_string(),
        )),
        Action::Delete if has_key => Ok(Route::Delete),
        Action::Delete => Err(SinkError::Validation(
            "key required for delete".to_string(),
        )),
    }
}

/// Everything resolved for one record before its SQL is built.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteIntent {
    pub table_name: String,
    pub key_column_name: Option<String>,
    pub row: ColumnValues,
}

/// Turns change records into statements. Performs no I/O.
#[derive(Debug, Clone)]
pub struct Translator<P = PlaceholderFormat> {
    config: Config,
    formatter: QueryFormatter<P>,
}

impl Translator {
    /// A translator producing PostgreSQL (`$n`) placeholders.
    pub fn postgres(config: Config) -> Self {
        Self::new(config, QueryFormatter::new(PlaceholderFormat::Dollar))
    }
}

impl<P: Placeholder> Translator<P> {
    pub fn new(config: Config, formatter: QueryFormatter<P>) -> Self {
        Self { config, formatter }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Route a record and build its statement.
    pub fn translate(&self, record: &ChangeRecord) -> Result<Statement, SinkError> {
        let route = route(
            record.effective_action(),
            record.has_key(),
            self.config.key_column_name().is_some(),
        )?;

        let statement = match route {
            Route::Insert => {
                let intent = self.resolve(record, false)?;
                self.formatter.insert(&intent.table_name, &intent.row)?
            }
            Route::Upsert => {
                let intent = self.resolve(record, true)?;
                let key_column = intent.key_column_name.as_deref().ok_or_else(|| {
                    SinkError::Validation("no key column available for upsert".to_string())
                })?;
                self.formatter.upsert(&intent.table_name, key_column, &intent.row)?
            }
            Route::Delete => self.delete(record)?,
        };

        debug!(route = %route, sql = %statement.sql, "Translated change record");
        Ok(statement)
    }

    /// Decode the record and resolve its table, key column and row.
    ///
    /// The key column is only resolved when `with_key_column` is set, so a
    /// plain INSERT accepts keys of any shape.
    pub fn resolve(
        &self,
        record: &ChangeRecord,
        with_key_column: bool,
    ) -> Result<WriteIntent, SinkError> {
        let key = record.decode_key().map_err(SinkError::decode_key)?;
        let payload = record.decode_payload().map_err(SinkError::decode_payload)?;

        let key_column_name = if with_key_column {
            resolve_key_column_name(&key, self.config.key_column_name())?
        } else {
            None
        };
        let table_name = resolve_table_name(record, &self.config)?;

        Ok(WriteIntent {
            table_name,
            key_column_name,
            row: merge(&key, payload),
        })
    }

    fn delete(&self, record: &ChangeRecord) -> Result<Statement, SinkError> {
        let key: StructuredData = record.decode_key().map_err(SinkError::decode_key)?;
        let key_column = resolve_key_column_name(&key, self.config.key_column_name())?
            .ok_or_else(|| {
                SinkError::Validation("no key column available for delete".to_string())
            })?;
        let table_name = resolve_table_name(record, &self.config)?;

        let key_value = key.get(&key_column).cloned().ok_or_else(|| {
            SinkError::Validation(format!("key has no value for key column '{key_column}'"))
        })?;

        Ok(self.formatter.delete(&table_name, &key_column, key_value)?)
    }
}
