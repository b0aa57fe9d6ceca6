//! Error types for validation.

use thiserror::Error;

/// Failures of the validation machinery itself.
///
/// Rule violations are not errors; they come back as data from the check
/// functions. This type covers the database round trip behind `unique`.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The uniqueness probe failed at the database.
    #[error("uniqueness check failed: {0}")]
    Execution(#[from] sqlx::Error),
}

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, ValidateError>;
