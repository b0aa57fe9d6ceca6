//! INSERT statement builder.

use std::marker::PhantomData;

use super::value::{SqlValue, ToSqlValue};

/// Marker: no target table yet.
pub struct NoTable;
/// Marker: target table supplied.
pub struct HasTable;

/// A single-row INSERT under construction.
pub struct Insert<Table> {
    table: Option<String>,
    columns: Vec<String>,
    values: Vec<SqlValue>,
    _state: PhantomData<Table>,
}

impl Insert<NoTable> {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: None,
            columns: vec![],
            values: vec![],
            _state: PhantomData,
        }
    }

    /// Supplies the target table.
    #[must_use]
    pub fn into_table(self, table: &str) -> Insert<HasTable> {
        Insert {
            table: Some(String::from(table)),
            columns: self.columns,
            values: self.values,
            _state: PhantomData,
        }
    }
}

impl Default for Insert<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Insert<HasTable> {
    /// Adds one column/value pair. Pairs render in call order.
    #[must_use]
    pub fn value<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.columns.push(String::from(column));
        self.values.push(value.to_sql_value());
        self
    }

    /// Renders the statement.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        let table = self.table.as_deref().unwrap_or_default();
        let placeholders: Vec<&str> = self.values.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            self.columns.join(", "),
            placeholders.join(", ")
        );
        (sql, self.values)
    }
}
