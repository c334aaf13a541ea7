//! Table and key column resolution.

use crate::config::Config;
use crate::error::SinkError;
use sync_core::{ChangeRecord, StructuredData};

/// The record's `table` metadata if set, otherwise the configured default.
pub fn resolve_table_name(record: &ChangeRecord, config: &Config) -> Result<String, SinkError> {
    record
        .table_override()
        .filter(|table| !table.is_empty())
        .or_else(|| config.table_name())
        .map(str::to_string)
        .ok_or_else(|| SinkError::Config("no table provided for default writes".to_string()))
}

/// The key column for a record.
///
/// A single-entry key names its own column, so keys are not tied to a fixed
/// `id` field. An empty key falls back to `default`. Keys with more than one
/// entry are refused: picking one of them would silently change which rows
/// a write touches.
pub fn resolve_key_column_name(
    key: &StructuredData,
    default: Option<&str>,
) -> Result<Option<String>, SinkError> {
    if key.len() > 1 {
        let columns: Vec<&str> = key.columns().collect();
        return Err(SinkError::Unsupported(format!(
            "composite keys are not supported (key columns: {})",
            columns.join(", ")
        )));
    }

    Ok(match key.single() {
        Some((column, _)) => Some(column.to_string()),
        None => default.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync_core::METADATA_TABLE;

    fn data(raw: &str) -> StructuredData {
        StructuredData::from_bytes(Some(raw.as_bytes())).unwrap()
    }

    fn config_with_table(table: Option<&str>) -> Config {
        Config {
            table_name: table.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn test_table_override_wins() {
        let record = ChangeRecord::new().with_metadata(METADATA_TABLE, "override");
        let table = resolve_table_name(&record, &config_with_table(Some("default"))).unwrap();
        assert_eq!(table, "override");
    }

    #[test]
    fn test_table_falls_back_to_config() {
        let table =
            resolve_table_name(&ChangeRecord::new(), &config_with_table(Some("default"))).unwrap();
        assert_eq!(table, "default");

        let record = ChangeRecord::new().with_metadata(METADATA_TABLE, "");
        let table = resolve_table_name(&record, &config_with_table(Some("default"))).unwrap();
        assert_eq!(table, "default");
    }

    #[test]
    fn test_no_table_is_config_error() {
        let err = resolve_table_name(&ChangeRecord::new(), &config_with_table(None)).unwrap_err();
        assert!(matches!(err, SinkError::Config(_)));
        assert!(err.to_string().contains("no table provided"));
    }

    #[test]
    fn test_single_key_names_the_column() {
        let column = resolve_key_column_name(&data(r#"{"user_uuid":"a"}"#), Some("id")).unwrap();
        assert_eq!(column.as_deref(), Some("user_uuid"));
    }

    #[test]
    fn test_empty_key_uses_default() {
        let column = resolve_key_column_name(&StructuredData::new(), Some("id")).unwrap();
        assert_eq!(column.as_deref(), Some("id"));

        let column = resolve_key_column_name(&StructuredData::new(), None).unwrap();
        assert_eq!(column, None);
    }

    #[test]
    fn test_composite_key_is_refused() {
        for raw in [r#"{"a":1,"b":2}"#, r#"{"a":1,"b":2,"c":3}"#] {
            let err = resolve_key_column_name(&data(raw), Some("id")).unwrap_err();
            assert!(matches!(err, SinkError::Unsupported(_)));
        }
    }
}
