//! SELECT statement builder.
//!
//! Immutable: every method takes and returns the builder by value, so a
//! statement under construction can never be observed half-mutated. The
//! typestate parameter tracks whether FROM has been supplied; `build()`
//! only exists once it has.

use std::marker::PhantomData;

use super::expr::Expr;
use super::value::SqlValue;

/// Marker: no FROM clause yet.
pub struct NoTable;
/// Marker: FROM clause supplied.
pub struct HasTable;

/// A SELECT statement under construction.
pub struct Select<Table> {
    columns: Vec<String>,
    table: Option<String>,
    joins: Vec<String>,
    predicate: Option<Expr>,
    group_by: Option<String>,
    order_by: Option<String>,
    limit: Option<u64>,
    _state: PhantomData<Table>,
}

impl Select<NoTable> {
    /// Creates a builder selecting `*`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: vec![],
            table: None,
            joins: vec![],
            predicate: None,
            group_by: None,
            order_by: None,
            limit: None,
            _state: PhantomData,
        }
    }

    /// Supplies the table, unlocking `build()`.
    #[must_use]
    pub fn from(self, table: &str) -> Select<HasTable> {
        Select {
            columns: self.columns,
            table: Some(String::from(table)),
            joins: self.joins,
            predicate: self.predicate,
            group_by: self.group_by,
            order_by: self.order_by,
            limit: self.limit,
            _state: PhantomData,
        }
    }
}

impl Default for Select<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Table> Select<Table> {
    /// Sets the output columns. Aggregate expressions are accepted as
    /// plain strings (`"MAX(price) AS top"`). Unset means `*`.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Appends an INNER JOIN. Joins render in call order.
    #[must_use]
    pub fn join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("JOIN {table} ON {on}"));
        self
    }

    /// Appends a LEFT JOIN.
    #[must_use]
    pub fn left_join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("LEFT JOIN {table} ON {on}"));
        self
    }

    /// Sets the WHERE predicate. Last call wins; callers AND fragments
    /// together beforehand via [`Expr::and`].
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.predicate = Some(expr);
        self
    }

    /// Sets the GROUP BY clause. Last call wins.
    #[must_use]
    pub fn group_by(mut self, spec: &str) -> Self {
        self.group_by = Some(String::from(spec));
        self
    }

    /// Sets the ORDER BY clause. Last call wins.
    #[must_use]
    pub fn order_by(mut self, spec: &str) -> Self {
        self.order_by = Some(String::from(spec));
        self
    }

    /// Sets the LIMIT clause. Last call wins.
    #[must_use]
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }
}

impl Select<HasTable> {
    /// Renders the statement.
    ///
    /// Clause order is fixed: SELECT, FROM, joins, WHERE, GROUP BY,
    /// ORDER BY, LIMIT. Unset clauses are omitted.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from("SELECT ");
        let mut params = vec![];

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }

        if let Some(ref table) = self.table {
            sql.push_str(" FROM ");
            sql.push_str(table);
        }

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        if let Some(predicate) = self.predicate {
            let (fragment, expr_params) = predicate.into_parts();
            sql.push_str(" WHERE ");
            sql.push_str(&fragment);
            params.extend(expr_params);
        }

        if let Some(ref group) = self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }

        if let Some(ref order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        (sql, params)
    }
}
