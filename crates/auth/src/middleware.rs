//! Request guard for protected routers

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::backend::AuthBackend;
use crate::error::AuthError;

/// Reject the request unless it carries a valid bearer token.
///
/// On success the resolved `AuthContext` is stored in the request
/// extensions for `AuthUser`; on failure the inner router never runs.
pub async fn require_auth(
    State(backend): State<AuthBackend>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = backend.authenticate_headers(request.headers()).map_err(|e| {
        tracing::debug!(error = %e, path = %request.uri().path(), "Authentication rejected");
        e
    })?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
