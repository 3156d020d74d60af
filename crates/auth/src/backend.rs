//! Concrete authentication backend
//!
//! Wraps `AuthConfig` behind an `Arc` so every domain state can hold a
//! cheap clone. Tokens are self-contained, so no database lookup happens
//! on the request path.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::{extract_bearer_token, issue_token, validate_jwt_token};

#[derive(Debug, Clone)]
pub struct AuthBackend {
    config: Arc<AuthConfig>,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Validate a raw bearer token
    pub fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = validate_jwt_token(token, &self.config)?;
        AuthContext::try_from(claims)
    }

    /// Authenticate from request headers (`Authorization: Bearer <jwt>`)
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        self.authenticate_jwt(&token)
    }

    /// Issue an access token for a user
    pub fn issue_token(&self, user_id: Uuid, name: &str) -> Result<String, AuthError> {
        issue_token(&user_id.to_string(), name, &self.config)
    }
}
