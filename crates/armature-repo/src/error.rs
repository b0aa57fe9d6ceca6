//! Error types for the repository layer.

use thiserror::Error;

/// Repository-specific errors.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The entity policy is unusable: table unset, or a write was
    /// attempted with no writable fields configured.
    #[error("repository misconfigured: {0}")]
    Configuration(String),

    /// The update/delete target row does not exist.
    ///
    /// A business-level signal; callers typically translate it into a
    /// 404-style response.
    #[error("row not found")]
    NotFound,

    /// A caller-supplied value cannot be bound to a column.
    #[error("invalid value for field: {0}")]
    InvalidField(String),

    /// The underlying database call failed.
    #[error("statement failed: {statement}")]
    Execution {
        /// The statement that was being executed.
        statement: String,
        /// The driver error.
        #[source]
        source: sqlx::Error,
    },
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepoError>;
