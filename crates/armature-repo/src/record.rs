//! Dynamic row representation.
//!
//! Handlers exchange plain key-value data, so rows come back as JSON maps
//! rather than typed structs. Column values decode by the column's declared
//! type affinity.

use armature_sql::SqlValue;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::{RepoError, Result};

/// A row as seen by handlers: column name to JSON value.
pub type Record = serde_json::Map<String, Value>;

/// Decodes a SQLite row into a [`Record`].
pub(crate) fn row_to_record(row: &SqliteRow) -> sqlx::Result<Record> {
    let mut record = Record::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
                "REAL" | "NUMERIC" => Value::from(row.try_get::<f64, _>(idx)?),
                "BOOLEAN" => Value::from(row.try_get::<bool, _>(idx)?),
                "BLOB" => Value::from(row.try_get::<Vec<u8>, _>(idx)?),
                _ => Value::from(row.try_get::<String, _>(idx)?),
            }
        };

        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}

/// Converts a caller-supplied JSON value into a bindable parameter.
///
/// Only scalars map to columns; arrays and objects are rejected.
pub(crate) fn json_to_sql(field: &str, value: &Value) -> Result<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::Float(f))
            } else {
                Err(RepoError::InvalidField(String::from(field)))
            }
        }
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => {
            Err(RepoError::InvalidField(String::from(field)))
        }
    }
}
