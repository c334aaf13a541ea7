//! INSERT, UPSERT and DELETE formatting.
//!
//! Identifiers are written as given. Values never appear in the SQL text;
//! they travel in [`Statement::args`] in placeholder order.

use crate::error::QueryError;
use crate::merge::ColumnValues;
use crate::placeholder::{Placeholder, PlaceholderFormat};
use serde_json::Value;
use std::fmt;

/// SQL text plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Builds statements using a placeholder style.
#[derive(Debug, Clone, Default)]
pub struct QueryFormatter<P = PlaceholderFormat> {
    placeholder: P,
}

impl<P: Placeholder> QueryFormatter<P> {
    pub fn new(placeholder: P) -> Self {
        Self { placeholder }
    }

    /// `INSERT INTO table (c1,c2) VALUES (p1,p2)`
    pub fn insert(&self, table: &str, row: &ColumnValues) -> Result<Statement, QueryError> {
        let sql = self.insert_sql(table, row)?;
        Ok(Statement {
            sql,
            args: row.values.clone(),
        })
    }

    /// An INSERT followed by an `ON CONFLICT` clause on `key_column`.
    ///
    /// Every column other than `key_column` is overwritten with the proposed
    /// row's value. When only the key column is present there is nothing to
    /// update and the clause becomes `DO NOTHING`.
    pub fn upsert(
        &self,
        table: &str,
        key_column: &str,
        row: &ColumnValues,
    ) -> Result<Statement, QueryError> {
        let mut sql = self.insert_sql(table, row)?;
        if key_column.is_empty() {
            return Err(QueryError::MissingKeyColumn(table.to_string()));
        }

        let assignments: Vec<String> = row
            .columns
            .iter()
            .filter(|column| column.as_str() != key_column)
            .map(|column| format!("{column}=EXCLUDED.{column}"))
            .collect();

        sql.push_str(" ON CONFLICT (");
        sql.push_str(key_column);
        if assignments.is_empty() {
            sql.push_str(") DO NOTHING;");
        } else {
            sql.push_str(") DO UPDATE SET ");
            sql.push_str(&assignments.join(", "));
            sql.push(';');
        }

        Ok(Statement {
            sql,
            args: row.values.clone(),
        })
    }

    /// `DELETE FROM table WHERE key_column = p1`
    pub fn delete(
        &self,
        table: &str,
        key_column: &str,
        key_value: Value,
    ) -> Result<Statement, QueryError> {
        if table.is_empty() {
            return Err(QueryError::MissingTable);
        }
        if key_column.is_empty() {
            return Err(QueryError::MissingKeyColumn(table.to_string()));
        }

        let mut sql = format!("DELETE FROM {table} WHERE {key_column} = ");
        self.placeholder.write_placeholder(&mut sql, 1)?;

        Ok(Statement {
            sql,
            args: vec![key_value],
        })
    }

    fn insert_sql(&self, table: &str, row: &ColumnValues) -> Result<String, QueryError> {
        if table.is_empty() {
            return Err(QueryError::MissingTable);
        }
        if row.columns.len() != row.values.len() {
            return Err(QueryError::LengthMismatch {
                columns: row.columns.len(),
                values: row.values.len(),
            });
        }
        if row.is_empty() {
            return Err(QueryError::NoColumns(table.to_string()));
        }

        let mut sql = format!("INSERT INTO {table} ({}) VALUES (", row.columns.join(","));
        for position in 1..=row.values.len() {
            if position > 1 {
                sql.push(',');
            }
            self.placeholder.write_placeholder(&mut sql, position)?;
        }
        sql.push(')');
        Ok(sql)
    }
}
