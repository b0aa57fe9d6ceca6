//! UPDATE statement builder.

use std::marker::PhantomData;

use super::expr::Expr;
use super::value::{SqlValue, ToSqlValue};

/// Marker: no target table yet.
pub struct NoTable;
/// Marker: target table supplied.
pub struct HasTable;

/// An UPDATE under construction.
pub struct Update<Table> {
    table: Option<String>,
    assignments: Vec<(String, SqlValue)>,
    predicate: Option<Expr>,
    _state: PhantomData<Table>,
}

impl Update<NoTable> {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: None,
            assignments: vec![],
            predicate: None,
            _state: PhantomData,
        }
    }

    /// Supplies the target table.
    #[must_use]
    pub fn table(self, table: &str) -> Update<HasTable> {
        Update {
            table: Some(String::from(table)),
            assignments: self.assignments,
            predicate: self.predicate,
            _state: PhantomData,
        }
    }
}

impl Default for Update<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Update<HasTable> {
    /// Adds a SET assignment. Assignments render in call order.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.assignments.push((String::from(column), value.to_sql_value()));
        self
    }

    /// Sets the WHERE predicate. Last call wins.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.predicate = Some(expr);
        self
    }

    /// Renders the statement. SET parameters precede WHERE parameters.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        let table = self.table.as_deref().unwrap_or_default();
        let set_parts: Vec<String> = self
            .assignments
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect();

        let mut sql = format!("UPDATE {table} SET {}", set_parts.join(", "));
        let mut params: Vec<SqlValue> =
            self.assignments.into_iter().map(|(_, v)| v).collect();

        if let Some(predicate) = self.predicate {
            let (fragment, expr_params) = predicate.into_parts();
            sql.push_str(" WHERE ");
            sql.push_str(&fragment);
            params.extend(expr_params);
        }

        (sql, params)
    }
}
