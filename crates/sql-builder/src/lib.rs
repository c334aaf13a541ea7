//! Parameterized SQL for change records.
//!
//! This crate turns decoded record data into statements:
//!
//! - [`merge`] - Combine key and payload into index-aligned columns and values
//! - [`QueryFormatter`] - Format INSERT, UPSERT (`ON CONFLICT`) and DELETE statements
//! - [`Placeholder`] - Bind parameter spelling, chosen per formatter
//!
//! # Example
//!
//! ```rust
//! use sql_builder::{merge, PlaceholderFormat, QueryFormatter};
//! use sync_core::StructuredData;
//!
//! let key = StructuredData::from_bytes(Some(br#"{"id":5}"#)).unwrap();
//! let payload = StructuredData::from_bytes(Some(br#"{"val":"a"}"#)).unwrap();
//!
//! let formatter = QueryFormatter::new(PlaceholderFormat::Dollar);
//! let stmt = formatter.upsert("t", "id", &merge(&key, payload)).unwrap();
//! assert_eq!(
//!     stmt.sql,
//!     "INSERT INTO t (id,val) VALUES ($1,$2) ON CONFLICT (id) DO UPDATE SET val=EXCLUDED.val;"
//! );
//! ```

mod error;
pub mod merge;
pub mod placeholder;
pub mod query;

pub use error::QueryError;
pub use merge::{merge, ColumnValues};
pub use placeholder::{ParsePlaceholderError, Placeholder, PlaceholderFormat};
pub use query::{QueryFormatter, Statement};
