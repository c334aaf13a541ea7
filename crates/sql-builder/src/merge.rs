//! Key and payload merging.

use serde_json::Value;
use sync_core::StructuredData;

/// Index-aligned column and value lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Combine key and payload into one column list.
///
/// Key entries come first and win over payload entries of the same name,
/// which are dropped. Both groups keep the lexicographic order of
/// [`StructuredData`], so the output is the same for the same input.
pub fn merge(key: &StructuredData, mut payload: StructuredData) -> ColumnValues {
    let mut merged = ColumnValues {
        columns: Vec::with_capacity(key.len() + payload.len()),
        values: Vec::with_capacity(key.len() + payload.len()),
    };

    for (column, value) in key {
        payload.remove(column);
        merged.columns.push(column.clone());
        merged.values.push(value.clone());
    }

    for (column, value) in payload {
        merged.columns.push(column);
        merged.values.push(value);
    }

    merged
}
