//! Identity attached to authenticated requests

use uuid::Uuid;

use crate::claims::Claims;
use crate::error::AuthError;

/// Represents an authenticated user context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub name: String,
}

impl AuthContext {
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

impl TryFrom<Claims> for AuthContext {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;
        Ok(Self::new(user_id, claims.name))
    }
}
