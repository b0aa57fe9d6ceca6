//! The per-operation query accumulator.
//!
//! `Query` is an immutable description of one pending SELECT: every chained
//! call consumes the value and returns the next one, and the terminal
//! operations consume it outright. There is no shared mutable state to
//! reset and nothing to leak between logical operations, so a single
//! [`Repository`](crate::Repository) may serve overlapping requests.

use armature_sql::{col, Expr, Select, SqlValue, ToSqlValue};

use crate::error::Result;
use crate::policy::EntityPolicy;

#[derive(Debug, Clone)]
struct Join {
    table: String,
    on: String,
    left: bool,
}

/// An accumulated, not-yet-executed SELECT description.
#[derive(Debug, Clone, Default)]
pub struct Query {
    columns: Vec<String>,
    eq_predicates: Vec<(String, SqlValue)>,
    in_predicates: Vec<(String, Vec<SqlValue>)>,
    between_predicates: Vec<(String, SqlValue, SqlValue)>,
    null_predicates: Vec<String>,
    raw_predicates: Vec<String>,
    joins: Vec<Join>,
    group_by: Option<String>,
    order_by: Option<String>,
    limit: Option<u64>,
}

impl Query {
    /// Creates an empty query (selects `*`, no predicates).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output columns. Aggregate expressions are accepted as
    /// plain strings. Last call wins; unset means `*`.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Selects `MAX(column) AS alias`.
    #[must_use]
    pub fn select_max(mut self, column: &str, alias: &str) -> Self {
        self.columns = vec![format!("MAX({column}) AS {alias}")];
        self
    }

    /// Adds an equality predicate. Predicates AND together; a later call
    /// on the same column overwrites the earlier value (mapping
    /// semantics, keys unique).
    #[must_use]
    pub fn where_eq<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        let value = value.to_sql_value();
        match self.eq_predicates.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = value,
            None => self.eq_predicates.push((String::from(column), value)),
        }
        self
    }

    /// Adds a set-membership predicate, ANDed with the others.
    #[must_use]
    pub fn where_in<T: ToSqlValue>(mut self, column: &str, values: Vec<T>) -> Self {
        let values = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        self.in_predicates.push((String::from(column), values));
        self
    }

    /// Adds a range predicate, ANDed with the others.
    #[must_use]
    pub fn where_between<T: ToSqlValue, U: ToSqlValue>(
        mut self,
        column: &str,
        low: T,
        high: U,
    ) -> Self {
        self.between_predicates.push((
            String::from(column),
            low.to_sql_value(),
            high.to_sql_value(),
        ));
        self
    }

    /// Adds an IS NULL predicate, ANDed with the others. The usual way
    /// to exclude soft-deleted rows (`where_null("deleted_at")`).
    #[must_use]
    pub fn where_null(mut self, column: &str) -> Self {
        self.null_predicates.push(String::from(column));
        self
    }

    /// Adds a raw predicate fragment, ANDed with the others.
    ///
    /// The fragment is emitted verbatim; never put user input in it.
    #[must_use]
    pub fn where_raw(mut self, fragment: &str) -> Self {
        self.raw_predicates.push(String::from(fragment));
        self
    }

    /// Appends an INNER JOIN. Joins render in call order.
    #[must_use]
    pub fn join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(Join {
            table: String::from(table),
            on: String::from(on),
            left: false,
        });
        self
    }

    /// Appends a LEFT JOIN.
    #[must_use]
    pub fn left_join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(Join {
            table: String::from(table),
            on: String::from(on),
            left: true,
        });
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

    /// Renders the SELECT for the given policy.
    ///
    /// Fails with a configuration error when the policy has no table.
    pub fn build_select(self, policy: &EntityPolicy) -> Result<(String, Vec<SqlValue>)> {
        let table = policy.table_name()?;

        let mut select = Select::new();
        if !self.columns.is_empty() {
            let cols: Vec<&str> = self.columns.iter().map(String::as_str).collect();
            select = select.columns(&cols);
        }

        let mut select = select.from(table);

        for join in &self.joins {
            select = if join.left {
                select.left_join(&join.table, &join.on)
            } else {
                select.join(&join.table, &join.on)
            };
        }

        if let Some(predicate) = self.combined_predicate() {
            select = select.where_clause(predicate);
        }
        if let Some(ref group) = self.group_by {
            select = select.group_by(group);
        }
        if let Some(ref order) = self.order_by {
            select = select.order_by(order);
        }
        if let Some(n) = self.limit {
            select = select.limit(n);
        }

        Ok(select.build())
    }

    /// ANDs every predicate form together: equality first, then IN, then
    /// BETWEEN, then IS NULL, then raw fragments.
    fn combined_predicate(&self) -> Option<Expr> {
        let mut parts: Vec<Expr> = vec![];

        for (column, value) in &self.eq_predicates {
            parts.push(col(column).eq(value.clone()));
        }
        for (column, values) in &self.in_predicates {
            parts.push(col(column).in_list(values.clone()));
        }
        for (column, low, high) in &self.between_predicates {
            parts.push(col(column).between(low.clone(), high.clone()));
        }
        for column in &self.null_predicates {
            parts.push(col(column).is_null());
        }
        for fragment in &self.raw_predicates {
            parts.push(Expr::raw(fragment.clone()));
        }

        parts.into_iter().reduce(Expr::and)
    }
}
