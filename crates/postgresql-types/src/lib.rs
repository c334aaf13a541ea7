//! PostgreSQL parameter binding for change record values.
//!
//! Change records carry untyped JSON. This crate converts each argument into
//! the type PostgreSQL expects for its parameter, and binds it through
//! `tokio-postgres`.
//!
//! # Modules
//!
//! - [`forward`] - JSON value → PostgreSQL value conversion
//!
//! # Example
//!
//! ```ignore
//! use postgresql_types::PostgreSQLValue;
//! use postgres_types::Type;
//!
//! let pg_val = PostgreSQLValue::from_json(&serde_json::json!(42), &Type::INT4)?;
//! assert_eq!(pg_val, PostgreSQLValue::Int32(42));
//! ```

pub mod error;
pub mod forward;

pub use error::ConversionError;
pub use forward::PostgreSQLValue;
