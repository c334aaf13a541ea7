//! Destination configuration.

use std::collections::HashMap;

/// Configuration key for the PostgreSQL connection string.
pub const CONFIG_URL: &str = "url";

/// Configuration key for the default table.
pub const CONFIG_TABLE: &str = "table";

/// Configuration key for the default key column.
pub const CONFIG_KEY_COLUMN_NAME: &str = "keyColumnName";

/// Settings for one destination session. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// PostgreSQL connection string
    pub url: String,
    /// Table used when a record has no `table` metadata
    pub table_name: Option<String>,
    /// Key column used when the record key does not name one
    pub key_column_name: Option<String>,
}

impl Config {
    /// Build a configuration from a string map.
    ///
    /// Recognized keys are `url`, `table` and `keyColumnName`. Others are
    /// ignored. Empty values count as unset.
    pub fn from_map(cfg: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| cfg.get(key).filter(|v| !v.is_empty()).cloned();
        Self {
            url: cfg.get(CONFIG_URL).cloned().unwrap_or_default(),
            table_name: non_empty(CONFIG_TABLE),
            key_column_name: non_empty(CONFIG_KEY_COLUMN_NAME),
        }
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn key_column_name(&self) -> Option<&str> {
        self.key_column_name.as_deref()
    }
}
