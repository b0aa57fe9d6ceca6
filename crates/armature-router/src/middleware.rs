//! Middleware support for request/response processing.

pub use futures::future::BoxFuture;

use crate::request::Request;
use crate::response::Response;

/// Result of middleware processing.
pub enum MiddlewareResult {
    /// Continue to the next middleware/handler.
    Continue(Request),
    /// Stop processing and return this response.
    Response(Response),
}

/// Trait for middleware that processes requests and responses.
///
/// Middleware can modify the request before it reaches the handler,
/// short-circuit with a response, or modify the response afterwards.
pub trait Middleware: Send + Sync {
    /// Called before the request handler.
    fn before<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, MiddlewareResult>;

    /// Called after the request handler.
    fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response>;
}

/// Middleware that emits a tracing event per request and response.
pub struct RequestLogger;

impl Middleware for RequestLogger {
    fn before<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            tracing::info!(method = %req.method, path = %req.path, "request received");
            MiddlewareResult::Continue(req.clone())
        })
    }

    fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            tracing::info!(status = res.status, "response sent");
            res
        })
    }
}
