//! Core types for pg-change-sink.
//!
//! This crate provides the foundational types shared by the workspace:
//!
//! - [`ChangeRecord`] - A change event: action, key bytes, payload bytes and metadata
//! - [`Action`] - The write a record asks for
//! - [`StructuredData`] - Column → JSON value mapping decoded from record bytes
//! - [`DecodeError`] - Failure to decode key or payload bytes
//!
//! # Architecture
//!
//! ```text
//! sync-core (this crate)
//!    │
//!    ├─── sql-builder        (merges key/payload and formats statements)
//!    ├─── postgresql-types   (binds JSON values to PostgreSQL parameters)
//!    └─── postgresql-sink    (routes records and executes statements)
//! ```
//!
//! # Example
//!
//! ```rust
//! use sync_core::{Action, ChangeRecord};
//!
//! let record = ChangeRecord::new()
//!     .with_action(Action::Update)
//!     .with_key(r#"{"id":1}"#)
//!     .with_payload(r#"{"name":"x"}"#);
//!
//! assert!(record.has_key());
//! assert_eq!(record.decode_key().unwrap().len(), 1);
//! ```

pub mod data;
pub mod error;
pub mod record;

pub use data::StructuredData;
pub use error::DecodeError;
pub use record::{Action, ChangeRecord, METADATA_ACTION, METADATA_TABLE};
