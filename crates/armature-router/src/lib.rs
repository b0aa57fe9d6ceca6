//! URL routing, middleware, and the startup service registry.
//!
//! This crate provides:
//! - Path pattern matching with `{param}` and `{*wildcard}` segments
//! - HTTP method-based routing with distinct 404 and 405 outcomes
//! - Middleware support (before/after hooks)
//! - An explicit [`Registry`] for the shared instances handlers use
//!
//! ## Quick Start
//!
//! ```ignore
//! use armature_router::{Request, RequestLogger, Response, Router};
//!
//! async fn user_handler(req: Request) -> Response {
//!     let id = req.params.get("id").unwrap_or("unknown");
//!     Response::json(&serde_json::json!({ "id": id }))
//! }
//!
//! let router = Router::new()
//!     .middleware(RequestLogger)
//!     .get("/users/{id}", user_handler);
//!
//! let response = router.handle(Request::get("/users/123")).await;
//! assert_eq!(response.status, 200);
//! ```
//!
//! ## Registry
//!
//! Shared services are registered by name at startup and fetched by name
//! and type inside handlers. Nothing is discovered from the filesystem or
//! the environment; what the registry holds is exactly what was
//! registered:
//!
//! ```ignore
//! let registry = Registry::new()
//!     .register("users", users_repository)
//!     .register("user_rules", user_rule_set);
//!
//! let users = registry.require::<Repository>("users")?;
//! ```

mod error;
mod middleware;
mod path;
mod registry;
mod request;
mod response;
mod router;

pub use error::{Result, RouterError};
pub use middleware::{BoxFuture, Middleware, MiddlewareResult, RequestLogger};
pub use path::PathPattern;
pub use registry::Registry;
pub use request::{Method, PathParams, Request};
pub use response::Response;
pub use router::{Handler, Route, Router};
