//! Change record model.
//!
//! A [`ChangeRecord`] is what an upstream source hands to a destination: an
//! action, optional key and payload bytes, and string metadata. The metadata
//! may override the action (`"action"`) and the target table (`"table"`) for
//! that one record.

use crate::data::StructuredData;
use crate::error::DecodeError;
use std::collections::HashMap;
use std::fmt;

/// Metadata key overriding the record's action.
pub const METADATA_ACTION: &str = "action";

/// Metadata key overriding the destination table.
pub const METADATA_TABLE: &str = "table";

/// The write a change record asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    Insert,
    Update,
    Delete,
    /// No action declared, or one that was not recognized.
    #[default]
    Unspecified,
}

impl Action {
    /// Parse an action name. Unknown names map to [`Action::Unspecified`].
    pub fn parse(s: &str) -> Self {
        match s {
            "insert" => Self::Insert,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single change event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeRecord {
    /// Action declared by the source. `metadata["action"]` takes precedence.
    pub action: Action,
    /// Raw key bytes, expected to hold a JSON object.
    pub key: Option<Vec<u8>>,
    /// Raw payload bytes, expected to hold a JSON object.
    pub payload: Option<Vec<u8>>,
    pub metadata: HashMap<String, String>,
}

impl ChangeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The action to route on: the metadata override if present, otherwise
    /// the declared action.
    pub fn effective_action(&self) -> Action {
        match self.metadata.get(METADATA_ACTION) {
            Some(name) => Action::parse(name),
            None => self.action,
        }
    }

    /// The per-record table override, if any.
    pub fn table_override(&self) -> Option<&str> {
        self.metadata.get(METADATA_TABLE).map(String::as_str)
    }

    /// True iff key bytes are present and non-empty.
    pub fn has_key(&self) -> bool {
        self.key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Decode the key bytes. Absent or empty bytes give an empty mapping.
    pub fn decode_key(&self) -> Result<StructuredData, DecodeError> {
        StructuredData::from_bytes(self.key.as_deref())
    }

    /// Decode the payload bytes. Absent or empty bytes give an empty mapping.
    pub fn decode_payload(&self) -> Result<StructuredData, DecodeError> {
        StructuredData::from_bytes(self.payload.as_deref())
    }
}
