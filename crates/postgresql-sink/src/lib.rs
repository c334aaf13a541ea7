//! PostgreSQL destination for change records.
//!
//! This crate decides, per record, whether to INSERT, UPSERT or DELETE, and
//! applies the resulting statement:
//!
//! - [`route`] / [`Translator`] - Pick the write path and build the statement (no I/O)
//! - [`resolve_table_name`] / [`resolve_key_column_name`] - Per-record table and key column
//! - [`Executor`] - Statement execution seam, with [`PostgresExecutor`] and [`DryRunExecutor`]
//! - [`Destination`] - configure / open / write / flush / teardown lifecycle
//!
//! Every error is scoped to one record. A failed record leaves the
//! destination usable for the next one.

pub mod config;
pub mod destination;
pub mod error;
pub mod executor;
pub mod postgres;
pub mod resolve;
pub mod router;

pub use config::{Config, CONFIG_KEY_COLUMN_NAME, CONFIG_TABLE, CONFIG_URL};
pub use destination::{Destination, PostgresDestination};
pub use error::SinkError;
pub use executor::{DryRunExecutor, Executor};
pub use postgres::PostgresExecutor;
pub use resolve::{resolve_key_column_name, resolve_table_name};
pub use router::{route, Route, Translator, WriteIntent};
