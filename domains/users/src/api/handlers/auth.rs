//! Registration and login handlers
//!
//! Implements:
//! - POST /api/v1/auth/register: create an account and return a token
//! - POST /api/v1/auth/login: exchange credentials for a token

use axum::{extract::State, http::StatusCode, Json};
use jobtrack_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::UsersState;
use crate::domain::entities::User;

/// Request body for `POST /register`
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "must be 3-50 characters"))]
    pub name: String,

    #[validate(email(message = "must be a valid email"))]
    pub email: String,

    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

/// Request body for `POST /login`
///
/// Both fields are optional at the type level so a missing field gets
/// the dedicated message instead of a deserializer error.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public part of the user returned with a token
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub name: String,
}

/// Response shape for register and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub user: UserSummary,
    pub token: String,
}

impl TokenResponse {
    fn for_user(state: &UsersState, user: User) -> Result<Self> {
        let token = state.auth.issue_token(user.id, &user.name)?;
        Ok(Self {
            user: UserSummary { name: user.name },
            token,
        })
    }
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<UsersState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    // Validated before the expensive hash runs.
    let mut user = User::new(req.name, req.email, String::new())?;
    user.password_hash = state.hasher.hash(req.password).await?;
    let user = state.repos.users.create(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse::for_user(&state, user)?),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<UsersState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let (email, password) = match (req.email, req.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return Err(Error::Validation(
                "Please provide email and password".to_string(),
            ))
        }
    };

    let invalid = || Error::Authentication("Invalid Credentials".to_string());

    let Some(user) = state.repos.users.find_by_email(&email).await? else {
        state.hasher.verify_absent(password).await?;
        return Err(invalid());
    };

    if !state
        .hasher
        .verify(password, user.password_hash.clone())
        .await?
    {
        tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
        return Err(invalid());
    }

    Ok(Json(TokenResponse::for_user(&state, user)?))
}
