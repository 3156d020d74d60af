//! Catch-all responders mounted after every router

use std::any::Any;

use axum::response::{IntoResponse, Response};
use jobtrack_common::Error;

/// Answer for any path (or method) no route claims
pub async fn not_found() -> Error {
    Error::NotFound("Route does not exist".to_string())
}

/// Render a panic anywhere in the pipeline as a uniform 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = detail, "Request handler panicked");

    Error::Internal("Something went wrong, try again later".to_string()).into_response()
}
