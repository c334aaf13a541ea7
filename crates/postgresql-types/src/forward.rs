//! Forward conversion: JSON value → PostgreSQL value
//!
//! Change record values are untyped JSON. PostgreSQL reports the type of each
//! parameter when a statement is prepared, and this module converts every
//! argument into that type before it is bound.

use crate::error::ConversionError;
use base64::Engine;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use postgres_types::{to_sql_checked, IsNull, Kind, ToSql, Type};
use rust_decimal::Decimal;
use serde_json::Value;
use std::error::Error;
use std::str::FromStr;
use uuid::Uuid;

/// PostgreSQL value wrapper for type-safe conversions.
///
/// This enum wraps the PostgreSQL-compatible types a JSON value can be
/// converted into, and binds as a tokio-postgres parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum PostgreSQLValue {
    /// Null value (valid for any parameter type)
    Null,
    /// Boolean value
    Bool(bool),
    /// 16-bit signed integer
    Int16(i16),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 32-bit floating point
    Float32(f32),
    /// 64-bit floating point
    Float64(f64),
    /// Decimal value
    Decimal(Decimal),
    /// Text/string value
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// UUID value
    Uuid(Uuid),
    /// Date value (no time)
    Date(NaiveDate),
    /// Time value (no date)
    Time(NaiveTime),
    /// Timestamp without timezone
    Timestamp(NaiveDateTime),
    /// Timestamp with timezone
    TimestampTz(DateTime<Utc>),
    /// JSON value
    Json(Value),
    /// Array of text values (PostgreSQL text[])
    TextArray(Vec<Option<String>>),
    /// Array of i32 values (PostgreSQL integer[])
    Int32Array(Vec<Option<i32>>),
    /// Array of i64 values (PostgreSQL bigint[])
    Int64Array(Vec<Option<i64>>),
    /// Array of f64 values (PostgreSQL double precision[])
    Float64Array(Vec<Option<f64>>),
    /// Array of boolean values (PostgreSQL boolean[])
    BoolArray(Vec<Option<bool>>),
}

impl PostgreSQLValue {
    /// Convert a JSON value into a value of the given parameter type.
    ///
    /// `null` converts to SQL NULL for every type. Numbers and booleans
    /// given as JSON strings are parsed. Any JSON value binds to a text-like
    /// parameter; non-strings are rendered as JSON text.
    pub fn from_json(value: &Value, pg_type: &Type) -> Result<Self, ConversionError> {
        if value.is_null() {
            return Ok(PostgreSQLValue::Null);
        }

        match pg_type {
            t if *t == Type::BOOL => to_bool(value, t).map(PostgreSQLValue::Bool),

            // Integer types
            t if *t == Type::INT2 => {
                let i = to_i64(value, t)?;
                i16::try_from(i)
                    .map(PostgreSQLValue::Int16)
                    .map_err(|_| out_of_range(value, t))
            }
            t if *t == Type::INT4 => {
                let i = to_i64(value, t)?;
                i32::try_from(i)
                    .map(PostgreSQLValue::Int32)
                    .map_err(|_| out_of_range(value, t))
            }
            t if *t == Type::INT8 => to_i64(value, t).map(PostgreSQLValue::Int64),

            // Floating point
            t if *t == Type::FLOAT4 => to_f32(value, t).map(PostgreSQLValue::Float32),
            t if *t == Type::FLOAT8 => to_f64(value, t).map(PostgreSQLValue::Float64),

            // Decimal
            t if *t == Type::NUMERIC => to_decimal(value, t).map(PostgreSQLValue::Decimal),

            // String types
            t if is_text(t) => Ok(PostgreSQLValue::Text(to_text(value))),

            // JSON
            t if *t == Type::JSON || *t == Type::JSONB => Ok(PostgreSQLValue::Json(value.clone())),

            // UUID
            t if *t == Type::UUID => {
                let s = expect_str(value, t)?;
                Ok(PostgreSQLValue::Uuid(Uuid::parse_str(s)?))
            }

            // Date/Time types
            t if *t == Type::TIMESTAMPTZ => {
                let s = expect_str(value, t)?;
                DateTime::parse_from_rfc3339(s)
                    .map(|dt| PostgreSQLValue::TimestampTz(dt.with_timezone(&Utc)))
                    .map_err(|e| ConversionError::InvalidDateTime(format!("{s}: {e}")))
            }
            t if *t == Type::TIMESTAMP => {
                let s = expect_str(value, t)?;
                parse_timestamp(s).map(PostgreSQLValue::Timestamp)
            }
            t if *t == Type::DATE => {
                let s = expect_str(value, t)?;
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(PostgreSQLValue::Date)
                    .map_err(|e| ConversionError::InvalidDateTime(format!("{s}: {e}")))
            }
            t if *t == Type::TIME => {
                let s = expect_str(value, t)?;
                NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                    .map(PostgreSQLValue::Time)
                    .map_err(|e| ConversionError::InvalidDateTime(format!("{s}: {e}")))
            }

            // Binary, carried as base64 text in JSON
            t if *t == Type::BYTEA => {
                let s = expect_str(value, t)?;
                let bytes = base64::engine::general_purpose::STANDARD.decode(s)?;
                Ok(PostgreSQLValue::Bytes(bytes))
            }

            // Arrays
            t if *t == Type::TEXT_ARRAY || *t == Type::VARCHAR_ARRAY => {
                array_of(value, t, |v| Ok(to_text(v))).map(PostgreSQLValue::TextArray)
            }
            t if *t == Type::INT4_ARRAY => array_of(value, t, |v| {
                let i = to_i64(v, &Type::INT4)?;
                i32::try_from(i).map_err(|_| out_of_range(v, &Type::INT4))
            })
            .map(PostgreSQLValue::Int32Array),
            t if *t == Type::INT8_ARRAY => {
                array_of(value, t, |v| to_i64(v, &Type::INT8)).map(PostgreSQLValue::Int64Array)
            }
            t if *t == Type::FLOAT8_ARRAY => {
                array_of(value, t, |v| to_f64(v, &Type::FLOAT8)).map(PostgreSQLValue::Float64Array)
            }
            t if *t == Type::BOOL_ARRAY => {
                array_of(value, t, |v| to_bool(v, &Type::BOOL)).map(PostgreSQLValue::BoolArray)
            }

            // Enum - bound by label
            t if matches!(t.kind(), Kind::Enum(_)) => {
                let s = expect_str(value, t)?;
                Ok(PostgreSQLValue::Text(s.to_string()))
            }

            other => Err(ConversionError::UnsupportedType(other.name().to_string())),
        }
    }
}

impl ToSql for PostgreSQLValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            PostgreSQLValue::Null => Ok(IsNull::Yes),
            PostgreSQLValue::Bool(b) => b.to_sql(ty, out),
            PostgreSQLValue::Int16(i) => i.to_sql(ty, out),
            PostgreSQLValue::Int32(i) => i.to_sql(ty, out),
            PostgreSQLValue::Int64(i) => i.to_sql(ty, out),
            PostgreSQLValue::Float32(f) => f.to_sql(ty, out),
            PostgreSQLValue::Float64(f) => f.to_sql(ty, out),
            PostgreSQLValue::Decimal(d) => d.to_sql(ty, out),
            PostgreSQLValue::Text(s) => s.to_sql(ty, out),
            PostgreSQLValue::Bytes(b) => b.to_sql(ty, out),
            PostgreSQLValue::Uuid(u) => u.to_sql(ty, out),
            PostgreSQLValue::Date(d) => d.to_sql(ty, out),
            PostgreSQLValue::Time(t) => t.to_sql(ty, out),
            PostgreSQLValue::Timestamp(ts) => ts.to_sql(ty, out),
            PostgreSQLValue::TimestampTz(ts) => ts.to_sql(ty, out),
            PostgreSQLValue::Json(j) => j.to_sql(ty, out),
            PostgreSQLValue::TextArray(arr) => arr.to_sql(ty, out),
            PostgreSQLValue::Int32Array(arr) => arr.to_sql(ty, out),
            PostgreSQLValue::Int64Array(arr) => arr.to_sql(ty, out),
            PostgreSQLValue::Float64Array(arr) => arr.to_sql(ty, out),
            PostgreSQLValue::BoolArray(arr) => arr.to_sql(ty, out),
        }
    }

    // Values are converted against the reported parameter type beforehand.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn is_text(t: &Type) -> bool {
    *t == Type::TEXT
        || *t == Type::VARCHAR
        || *t == Type::BPCHAR
        || *t == Type::NAME
        || *t == Type::UNKNOWN
}

fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn expect_str<'a>(value: &'a Value, pg_type: &Type) -> Result<&'a str, ConversionError> {
    value.as_str().ok_or_else(|| mismatch(value, pg_type))
}

fn to_bool(value: &Value, pg_type: &Type) -> Result<bool, ConversionError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "t" => Ok(true),
            "false" | "f" => Ok(false),
            _ => Err(mismatch(value, pg_type)),
        },
        _ => Err(mismatch(value, pg_type)),
    }
}

/// 2^63, the smallest f64 above every i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn to_i64(value: &Value, pg_type: &Type) -> Result<i64, ConversionError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(out_of_range(value, pg_type))
            } else {
                // Accept floats only when they hold a whole number. i64::MAX is
                // not representable as f64; 2^63 is the exclusive upper bound.
                match n.as_f64() {
                    Some(f) if f.fract() != 0.0 || !f.is_finite() => Err(mismatch(value, pg_type)),
                    Some(f) if f >= -I64_BOUND && f < I64_BOUND => Ok(f as i64),
                    Some(_) => Err(out_of_range(value, pg_type)),
                    None => Err(mismatch(value, pg_type)),
                }
            }
        }
        Value::String(s) => s.trim().parse().map_err(|_| mismatch(value, pg_type)),
        _ => Err(mismatch(value, pg_type)),
    }
}

/// Narrow to f32, refusing finite values that would become infinite.
fn to_f32(value: &Value, pg_type: &Type) -> Result<f32, ConversionError> {
    let f = to_f64(value, pg_type)?;
    let narrowed = f as f32;
    if f.is_finite() && !narrowed.is_finite() {
        return Err(out_of_range(value, pg_type));
    }
    Ok(narrowed)
}

fn to_f64(value: &Value, pg_type: &Type) -> Result<f64, ConversionError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| mismatch(value, pg_type)),
        Value::String(s) => s.trim().parse().map_err(|_| mismatch(value, pg_type)),
        _ => Err(mismatch(value, pg_type)),
    }
}

fn to_decimal(value: &Value, pg_type: &Type) -> Result<Decimal, ConversionError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(mismatch(value, pg_type)),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| ConversionError::DecimalError(format!("{text}: {e}")))
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, ConversionError> {
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts);
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .map_err(|e| ConversionError::InvalidDateTime(format!("{s}: {e}")))
}

fn array_of<T>(
    value: &Value,
    pg_type: &Type,
    convert: impl Fn(&Value) -> Result<T, ConversionError>,
) -> Result<Vec<Option<T>>, ConversionError> {
    let items = value.as_array().ok_or_else(|| mismatch(value, pg_type))?;
    items
        .iter()
        .map(|item| {
            if item.is_null() {
                Ok(None)
            } else {
                convert(item).map(Some)
            }
        })
        .collect()
}

fn mismatch(value: &Value, pg_type: &Type) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: pg_type.name().to_string(),
        actual: json_kind(value).to_string(),
    }
}

fn out_of_range(value: &Value, pg_type: &Type) -> ConversionError {
    ConversionError::OutOfRange {
        value: value.to_string(),
        pg_type: pg_type.name().to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
