//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by access tokens issued at register/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
}
