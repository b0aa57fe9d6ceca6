//! # armature-repo
//!
//! The active-record core of the armature scaffold: an [`EntityPolicy`]
//! describing one mapped table, an immutable [`Query`] accumulator, and a
//! [`Repository`] that renders and executes statements against an injected
//! `sqlx` pool.
//!
//! ## Reads
//!
//! ```ignore
//! let products = Repository::new(
//!     pool,
//!     EntityPolicy::new()
//!         .table("products")
//!         .allowed_fields(&["name", "slug", "price"])
//!         .timestamps(true),
//! );
//!
//! let rows = products
//!     .get_result(
//!         products
//!             .query()
//!             .where_eq("status", "live")
//!             .order_by("price DESC")
//!             .limit(10),
//!     )
//!     .await?;
//!
//! let one = products
//!     .single(products.query().where_eq("slug", "widget"))
//!     .await?; // None when absent
//! ```
//!
//! ## Writes
//!
//! ```ignore
//! // Unknown keys are dropped; timestamps are stamped automatically.
//! let row = products.save(&payload).await?;
//! let row = products.update(5_i64, &changes).await?; // NotFound on absent id
//! let row = products.delete(5_i64).await?;           // soft or physical
//! ```
//!
//! Queries are plain immutable values: chaining builds a new description
//! and the terminal call consumes it, so nothing persists between logical
//! operations and a repository can be shared across concurrent requests.
//! Transactions, pool tuning, and schema management stay with the wrapped
//! database client.

mod error;
mod policy;
mod query;
mod record;
mod repository;

pub use error::{RepoError, Result};
pub use policy::EntityPolicy;
pub use query::Query;
pub use record::Record;
pub use repository::Repository;

// Re-export the parameter types callers need for keys and predicates.
pub use armature_sql::{SqlValue, ToSqlValue};
