//! Route definitions for Users domain API
//!
//! Paths are relative; the composition root nests them under `/api/v1/auth`.

use axum::{routing::post, Router};

use super::handlers::auth;
use super::middleware::UsersState;

/// Create all Users domain API routes
pub fn routes() -> Router<UsersState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}
