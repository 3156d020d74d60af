//! User domain entities

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::ValidateEmail;

use jobtrack_common::{Error, Result};

/// Name length bounds
pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 50;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new user from already-hashed credentials.
    ///
    /// Emails are stored lowercased so uniqueness is case-insensitive.
    pub fn new(name: String, email: String, password_hash: String) -> Result<Self> {
        let name = name.trim().to_string();
        let len = name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            return Err(Error::Validation(format!(
                "Name must be {}-{} characters",
                NAME_MIN_LEN, NAME_MAX_LEN
            )));
        }

        let email = normalize_email(&email);
        if !email.validate_email() {
            return Err(Error::Validation("Please provide a valid email".to_string()));
        }

        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
