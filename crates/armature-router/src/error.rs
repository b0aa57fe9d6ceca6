//! Error types for routing and the service registry.

use thiserror::Error;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No route matched the request.
    #[error("no route matched: {method} {path}")]
    NotFound { method: String, path: String },

    /// A route matched the path but not the method.
    #[error("method not allowed: {method} for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// The registry holds nothing under the requested name.
    #[error("no service registered under '{0}'")]
    ServiceMissing(String),

    /// The registered value has a different type than requested.
    #[error("service '{0}' registered with a different type")]
    ServiceTypeMismatch(String),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
