//! JSON Lines change record source
//!
//! Each non-blank line is one change record:
//!
//! ```text
//! {"action": "update", "key": {"id": 1}, "payload": {"name": "x"}, "metadata": {"table": "users"}}
//! ```
//!
//! Every field is optional. `key` and `payload` given as JSON strings are
//! taken as the raw bytes of the string, so undecodable bytes can be fed
//! through as they would arrive from a message broker. Any other JSON value
//! is serialized back to bytes.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::BufRead;
use sync_core::{Action, ChangeRecord};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// One line of the input, before conversion to a [`ChangeRecord`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordLine {
    pub action: Option<String>,
    pub key: Option<Value>,
    pub payload: Option<Value>,
    pub metadata: HashMap<String, String>,
}

impl From<RecordLine> for ChangeRecord {
    fn from(line: RecordLine) -> Self {
        ChangeRecord {
            action: line
                .action
                .as_deref()
                .map(Action::parse)
                .unwrap_or_default(),
            key: line.key.map(value_to_bytes),
            payload: line.payload.map(value_to_bytes),
            metadata: line.metadata,
        }
    }
}

fn value_to_bytes(value: Value) -> Vec<u8> {
    match value {
        Value::String(s) => s.into_bytes(),
        other => other.to_string().into_bytes(),
    }
}

/// Parse a single JSONL line into a change record.
pub fn parse_line(line: &str) -> Result<ChangeRecord> {
    let parsed: RecordLine =
        serde_json::from_str(line).map_err(|e| anyhow!("Error parsing change record: {e}"))?;
    Ok(parsed.into())
}

/// Iterator over `(line number, record)` pairs, skipping blank lines.
///
/// Line numbers are 1-based. A line that cannot be read or parsed yields an
/// error carrying its line number and iteration continues with the next line.
pub struct RecordReader<R> {
    lines: std::io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = (usize, Result<ChangeRecord>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => return Some((self.line_number, Err(e.into()))),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some((self.line_number, parse_line(&line)));
        }
    }
}

/// Async counterpart of [`RecordReader`] over a tokio reader.
///
/// [`AsyncRecordReader::next_record`] is cancel safe, so it can be raced
/// against a shutdown signal while the input is idle.
pub struct AsyncRecordReader<R> {
    lines: tokio::io::Lines<R>,
    line_number: usize,
}

impl<R: AsyncBufRead + Unpin> AsyncRecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// The next non-blank line and its parsed record, or `None` at end of input.
    ///
    /// Read failures end the stream with an error. Parse failures are
    /// returned per line.
    pub async fn next_record(&mut self) -> Result<Option<(usize, Result<ChangeRecord>)>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Ok(Some((self.line_number, parse_line(&line))));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use sync_core::METADATA_TABLE;

    #[test]
    fn test_parse_full_line() {
        let record = parse_line(
            r#"{"action":"update","key":{"id":1},"payload":{"name":"x"},"metadata":{"table":"users"}}"#,
        )
        .unwrap();
        assert_eq!(record.action, Action::Update);
        assert_eq!(record.key.as_deref(), Some(&br#"{"id":1}"#[..]));
        assert_eq!(record.payload.as_deref(), Some(&br#"{"name":"x"}"#[..]));
        assert_eq!(record.metadata.get(METADATA_TABLE).map(String::as_str), Some("users"));
    }

    #[test]
    fn test_parse_minimal_line() {
        let record = parse_line(r#"{"payload":{"a":1}}"#).unwrap();
        assert_eq!(record.action, Action::Unspecified);
        assert!(record.key.is_none());
        assert!(!record.has_key());
        assert!(record.metadata.is_empty());

        let record = parse_line(r#"{"key":null,"payload":null}"#).unwrap();
        assert!(record.key.is_none());
        assert!(record.payload.is_none());
    }

    #[test]
    fn test_string_values_are_raw_bytes() {
        let record = parse_line(r#"{"key":"{\"id\":3}","payload":"not json"}"#).unwrap();
        assert_eq!(record.decode_key().unwrap().len(), 1);
        assert!(record.decode_payload().is_err());

        let record = parse_line(r#"{"key":""}"#).unwrap();
        assert!(!record.has_key());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(parse_line(r#"{"paylod":{"a":1}}"#).is_err());
        assert!(parse_line("not json").is_err());
    }

    #[test]
    fn test_reader_skips_blank_lines_and_numbers_lines() {
        let input = "{\"payload\":{\"a\":1}}\n\n   \n{bad\n{\"action\":\"delete\",\"key\":{\"id\":1}}\n";
        let items: Vec<(usize, Result<ChangeRecord>)> = RecordReader::new(Cursor::new(input)).collect();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].0, 1);
        assert!(items[0].1.is_ok());
        assert_eq!(items[1].0, 4);
        assert!(items[1].1.is_err());
        assert_eq!(items[2].0, 5);
        assert_eq!(items[2].1.as_ref().unwrap().action, Action::Delete);
    }

    #[tokio::test]
    async fn test_async_reader_skips_blank_lines() {
        let input = "\n{\"payload\":{\"a\":1}}\n{bad\n";
        let mut reader = AsyncRecordReader::new(input.as_bytes());

        let (line, record) = reader.next_record().await.unwrap().unwrap();
        assert_eq!(line, 2);
        assert!(record.is_ok());

        let (line, record) = reader.next_record().await.unwrap().unwrap();
        assert_eq!(line, 3);
        assert!(record.is_err());

        assert!(reader.next_record().await.unwrap().is_none());
    }
}
