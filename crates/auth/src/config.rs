//! Authentication configuration

use std::time::Duration;

use jobtrack_common::Config;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// How long an issued token stays valid
    pub token_lifetime: Duration,
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime: config.jwt_lifetime,
        }
    }
}
