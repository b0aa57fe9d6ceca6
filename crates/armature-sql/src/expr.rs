//! Parameterized predicate fragments.

use super::value::{SqlValue, ToSqlValue};

/// Starts a predicate on the given column.
#[must_use]
pub fn col(name: &str) -> Column {
    Column {
        name: String::from(name),
    }
}

/// A column reference awaiting a comparison.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
}

impl Column {
    /// Equality against a bound value.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Expr {
        Expr {
            sql: format!("{} = ?", self.name),
            params: vec![value.to_sql_value()],
        }
    }

    /// Membership in a bound value list.
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: Vec<T>) -> Expr {
        let params: Vec<SqlValue> = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        let placeholders: Vec<&str> = params.iter().map(|_| "?").collect();
        Expr {
            sql: format!("{} IN ({})", self.name, placeholders.join(", ")),
            params,
        }
    }

    /// Range check against two bound values.
    #[must_use]
    pub fn between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> Expr {
        Expr {
            sql: format!("{} BETWEEN ? AND ?", self.name),
            params: vec![low.to_sql_value(), high.to_sql_value()],
        }
    }

    /// IS NULL check.
    #[must_use]
    pub fn is_null(self) -> Expr {
        Expr {
            sql: format!("{} IS NULL", self.name),
            params: vec![],
        }
    }
}

/// An accumulated predicate with its bound parameters.
#[derive(Debug, Clone)]
pub struct Expr {
    sql: String,
    params: Vec<SqlValue>,
}

impl Expr {
    /// Wraps a raw SQL fragment.
    ///
    /// The fragment is emitted verbatim; it must not contain user input.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: vec![],
        }
    }

    /// Conjoins with another predicate.
    #[must_use]
    pub fn and(mut self, other: Self) -> Self {
        self.sql = format!("{} AND {}", self.sql, other.sql);
        self.params.extend(other.params);
        self
    }

    /// The rendered fragment.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters, in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Consumes the expression, yielding fragment and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}
