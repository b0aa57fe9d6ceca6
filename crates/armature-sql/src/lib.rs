//! # armature-sql
//!
//! Parameterized SQL statement builders for the armature scaffold.
//!
//! Builders are immutable values: each chained call consumes the builder and
//! returns the next one, and `build()` consumes it outright, yielding the
//! statement text plus its `?`-bound parameters. User data never appears in
//! the statement text.
//!
//! ```
//! use armature_sql::{col, Select};
//!
//! let (sql, params) = Select::new()
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .where_clause(col("active").eq(true))
//!     .order_by("name")
//!     .limit(10)
//!     .build();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT id, name FROM users WHERE active = ? ORDER BY name LIMIT 10"
//! );
//! assert_eq!(params.len(), 1);
//! ```

mod delete;
mod expr;
mod insert;
mod select;
mod update;
pub mod value;

pub use delete::Delete;
pub use expr::{col, Column, Expr};
pub use insert::Insert;
pub use select::Select;
pub use update::Update;
pub use value::{SqlValue, ToSqlValue};
