//! The repository: policy plus pool, executing accumulated queries.

use armature_sql::{col, Delete, Insert, SqlValue, ToSqlValue, Update};
use chrono::Utc;
use sqlx::sqlite::{SqliteQueryResult, SqliteRow};
use sqlx::SqlitePool;

use crate::error::{RepoError, Result};
use crate::policy::EntityPolicy;
use crate::query::Query;
use crate::record::{json_to_sql, row_to_record, Record};

/// Timestamp format stamped into `created_at`/`updated_at`/`deleted_at`.
const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Data access for one entity.
///
/// Holds the immutable [`EntityPolicy`] and a cloned pool handle. The pool
/// is the only shared resource; it serializes connection acquisition under
/// its own limits. The repository itself carries no per-operation state,
/// so one instance may serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
    policy: EntityPolicy,
}

impl Repository {
    /// Creates a repository over an injected pool.
    #[must_use]
    pub fn new(pool: SqlitePool, policy: EntityPolicy) -> Self {
        Self { pool, policy }
    }

    /// The entity policy.
    #[must_use]
    pub fn policy(&self) -> &EntityPolicy {
        &self.policy
    }

    /// Starts a fresh query against this entity's table.
    #[must_use]
    pub fn query(&self) -> Query {
        Query::new()
    }

    /// Executes the query and returns every matching row.
    ///
    /// No match is an empty vector, not an error.
    pub async fn get_result(&self, query: Query) -> Result<Vec<Record>> {
        let (sql, params) = query.build_select(&self.policy)?;
        let rows = self.fetch_all(&sql, params).await?;
        rows.iter()
            .map(|row| row_to_record(row).map_err(|e| exec_err(&sql, e)))
            .collect()
    }

    /// Executes the query and returns the first matching row.
    ///
    /// `None` is the not-found sentinel, distinct from an empty row.
    pub async fn single(&self, query: Query) -> Result<Option<Record>> {
        let mut rows = self.get_result(query.limit(1)).await?;
        Ok(rows.pop())
    }

    /// Alias for [`single`](Self::single).
    pub async fn first(&self, query: Query) -> Result<Option<Record>> {
        self.single(query).await
    }

    /// Inserts `data`, filtered to the allow-listed fields, and returns
    /// the freshly inserted row re-fetched by primary key.
    ///
    /// Unknown and non-writable keys are silently dropped. With
    /// timestamps enabled, `created_at` and `updated_at` are stamped and
    /// admitted automatically; an allow-listed caller-supplied value for
    /// either wins over the stamp. When the caller did not supply the primary
    /// key, the driver's last-insert id locates the new row.
    pub async fn save(&self, data: &Record) -> Result<Record> {
        let table = self.policy.table_name()?.to_string();
        self.require_writable_policy()?;

        let pk_column = self.policy.primary_key_column().to_string();
        let mut insert = Insert::new().into_table(&table);
        let mut supplied_pk: Option<SqlValue> = None;
        let mut wrote = false;

        for (field, value) in data {
            if !self.policy.is_writable(field) {
                continue;
            }
            let bound = json_to_sql(field, value)?;
            if *field == pk_column {
                supplied_pk = Some(bound.clone());
            }
            insert = insert.value(field, bound);
            wrote = true;
        }

        if !wrote {
            return Err(RepoError::Configuration(String::from(
                "no writable fields in payload",
            )));
        }

        if self.policy.has_timestamps() {
            // A caller-supplied stamp already went through the loop
            // above; binding it again would duplicate the column.
            let supplied =
                |column: &str| data.contains_key(column) && self.policy.is_writable(column);
            let now = stamp_now();
            if !supplied("created_at") {
                insert = insert.value("created_at", now.clone());
            }
            if !supplied("updated_at") {
                insert = insert.value("updated_at", now);
            }
        }

        let (sql, params) = insert.build();
        let outcome = self.execute(&sql, params).await?;

        let pk_value = supplied_pk.unwrap_or(SqlValue::Int(outcome.last_insert_rowid()));
        self.single(Query::new().where_eq(&pk_column, pk_value))
            .await?
            .ok_or(RepoError::NotFound)
    }

    /// Updates the row with the given primary key from `data`, filtered
    /// to the allow-listed fields, and returns the updated row.
    ///
    /// Fails with [`RepoError::NotFound`] when no row was affected.
    pub async fn update<K: ToSqlValue>(&self, id: K, data: &Record) -> Result<Record> {
        let table = self.policy.table_name()?.to_string();
        self.require_writable_policy()?;

        let pk_column = self.policy.primary_key_column().to_string();
        let pk_value = id.to_sql_value();

        let mut update = Update::new().table(&table);
        let mut wrote = false;

        for (field, value) in data {
            if *field == pk_column || !self.policy.is_writable(field) {
                continue;
            }
            update = update.set(field, json_to_sql(field, value)?);
            wrote = true;
        }

        if !wrote {
            return Err(RepoError::Configuration(String::from(
                "no writable fields in payload",
            )));
        }

        if self.policy.has_timestamps()
            && !(data.contains_key("updated_at") && self.policy.is_writable("updated_at"))
        {
            update = update.set("updated_at", stamp_now());
        }

        let (sql, params) = update
            .where_clause(col(&pk_column).eq(pk_value.clone()))
            .build();
        let outcome = self.execute(&sql, params).await?;

        if outcome.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        self.single(Query::new().where_eq(&pk_column, pk_value))
            .await?
            .ok_or(RepoError::NotFound)
    }

    /// Deletes the row with the given primary key and returns it as it
    /// was immediately before deletion.
    ///
    /// With soft delete enabled, the row is kept and `deleted_at` is
    /// stamped instead. Fails with [`RepoError::NotFound`] when the row
    /// does not exist.
    pub async fn delete<K: ToSqlValue>(&self, id: K) -> Result<Record> {
        let table = self.policy.table_name()?.to_string();
        let pk_column = self.policy.primary_key_column().to_string();
        let pk_value = id.to_sql_value();

        let existing = self
            .single(Query::new().where_eq(&pk_column, pk_value.clone()))
            .await?
            .ok_or(RepoError::NotFound)?;

        if self.policy.is_soft_delete() {
            let (sql, params) = Update::new()
                .table(&table)
                .set("deleted_at", stamp_now())
                .where_clause(col(&pk_column).eq(pk_value))
                .build();
            self.execute(&sql, params).await?;
        } else {
            let (sql, params) = Delete::new()
                .from(&table)
                .where_clause(col(&pk_column).eq(pk_value))
                .build();
            self.execute(&sql, params).await?;
        }

        Ok(existing)
    }

    fn require_writable_policy(&self) -> Result<()> {
        if self.policy.has_writable_fields() {
            Ok(())
        } else {
            Err(RepoError::Configuration(String::from(
                "no fields allow-listed for writing",
            )))
        }
    }

    async fn fetch_all(&self, sql: &str, params: Vec<SqlValue>) -> Result<Vec<SqliteRow>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_value(query, param);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| exec_err(sql, e))
    }

    async fn execute(&self, sql: &str, params: Vec<SqlValue>) -> Result<SqliteQueryResult> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_value(query, param);
        }
        query
            .execute(&self.pool)
            .await
            .map_err(|e| exec_err(sql, e))
    }
}

/// Current UTC time in the fixed stamp format.
fn stamp_now() -> String {
    Utc::now().format(STAMP_FORMAT).to_string()
}

/// Logs a failed statement and wraps the driver error.
fn exec_err(statement: &str, source: sqlx::Error) -> RepoError {
    tracing::error!(statement, error = %source, "database call failed");
    RepoError::Execution {
        statement: String::from(statement),
        source,
    }
}

/// Binds a [`SqlValue`] parameter to a raw query.
fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}
