//! DELETE statement builder.

use std::marker::PhantomData;

use super::expr::Expr;
use super::value::SqlValue;

/// Marker: no target table yet.
pub struct NoTable;
/// Marker: target table supplied.
pub struct HasTable;

/// A DELETE under construction.
pub struct Delete<Table> {
    table: Option<String>,
    predicate: Option<Expr>,
    _state: PhantomData<Table>,
}

impl Delete<NoTable> {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: None,
            predicate: None,
            _state: PhantomData,
        }
    }

    /// Supplies the target table.
    #[must_use]
    pub fn from(self, table: &str) -> Delete<HasTable> {
        Delete {
            table: Some(String::from(table)),
            predicate: self.predicate,
            _state: PhantomData,
        }
    }
}

impl Default for Delete<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Delete<HasTable> {
    /// Sets the WHERE predicate. Without one the statement removes every
    /// row, so callers keying by primary-key must always set it.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.predicate = Some(expr);
        self
    }

    /// Renders the statement.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        let table = self.table.as_deref().unwrap_or_default();
        let mut sql = format!("DELETE FROM {table}");
        let mut params = vec![];

        if let Some(predicate) = self.predicate {
            let (fragment, expr_params) = predicate.into_parts();
            sql.push_str(" WHERE ");
            sql.push_str(&fragment);
            params.extend(expr_params);
        }

        (sql, params)
    }
}
