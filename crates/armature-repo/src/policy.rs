//! Per-entity configuration.

use crate::error::{RepoError, Result};

/// Configuration for one mapped table.
///
/// Built once via the consuming setters and immutable afterward. A policy
/// with no table name fails every data operation with
/// [`RepoError::Configuration`]; write operations additionally require at
/// least one allow-listed field (an empty allow-list means nothing is
/// writable, never "anything goes").
#[derive(Debug, Clone)]
pub struct EntityPolicy {
    table: Option<String>,
    primary_key: String,
    allowed_fields: Vec<String>,
    timestamps: bool,
    soft_delete: bool,
}

impl EntityPolicy {
    /// Creates a policy with defaults: primary key `id`, no timestamps,
    /// no soft delete, nothing writable.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: None,
            primary_key: String::from("id"),
            allowed_fields: vec![],
            timestamps: false,
            soft_delete: false,
        }
    }

    /// Sets the table name.
    #[must_use]
    pub fn table(mut self, name: &str) -> Self {
        self.table = Some(String::from(name));
        self
    }

    /// Sets the primary-key column.
    #[must_use]
    pub fn primary_key(mut self, key: &str) -> Self {
        self.primary_key = String::from(key);
        self
    }

    /// Allow-lists the writable fields.
    #[must_use]
    pub fn allowed_fields(mut self, fields: &[&str]) -> Self {
        self.allowed_fields = fields.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Enables `created_at`/`updated_at` stamping on writes.
    #[must_use]
    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Marks rows deleted via `deleted_at` instead of removing them.
    #[must_use]
    pub fn soft_delete(mut self, enabled: bool) -> Self {
        self.soft_delete = enabled;
        self
    }

    /// The table name, or a configuration error when unset.
    pub fn table_name(&self) -> Result<&str> {
        self.table
            .as_deref()
            .ok_or_else(|| RepoError::Configuration(String::from("table name not set")))
    }

    /// The primary-key column name.
    #[must_use]
    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }

    /// Whether the field may be written by callers.
    #[must_use]
    pub fn is_writable(&self, field: &str) -> bool {
        self.allowed_fields.iter().any(|f| f == field)
    }

    /// Whether any field is writable at all.
    #[must_use]
    pub fn has_writable_fields(&self) -> bool {
        !self.allowed_fields.is_empty()
    }

    /// Whether timestamp stamping is on.
    #[must_use]
    pub fn has_timestamps(&self) -> bool {
        self.timestamps
    }

    /// Whether soft delete is on.
    #[must_use]
    pub fn is_soft_delete(&self) -> bool {
        self.soft_delete
    }
}

impl Default for EntityPolicy {
    fn default() -> Self {
        Self::new()
    }
}
