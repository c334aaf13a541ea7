//! Structured data decoded from change record bytes.
//!
//! A [`StructuredData`] maps column names to JSON values. Entries are kept in
//! a `BTreeMap`, so iteration is always in lexicographic column order. SQL
//! arguments are bound by position, which makes a stable order a correctness
//! requirement rather than a cosmetic one.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Column name → value mapping decoded from a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredData(BTreeMap<String, Value>);

impl StructuredData {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode raw bytes into a mapping.
    ///
    /// Absent or empty bytes decode to an empty mapping. Anything else must be
    /// a JSON object.
    pub fn from_bytes(raw: Option<&[u8]>) -> Result<Self, DecodeError> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Self::new()),
        };

        match serde_json::from_slice::<Value>(raw)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(DecodeError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.0.remove(column)
    }

    /// Column names in iteration order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Return the single entry of a one-column mapping.
    pub fn single(&self) -> Option<(&str, &Value)> {
        if self.0.len() != 1 {
            return None;
        }
        self.0.iter().next().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for StructuredData {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for StructuredData {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StructuredData {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
