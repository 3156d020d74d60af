//! Password hashing with Argon2id

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use jobtrack_common::{Error, Result};
use tokio::sync::OnceCell;

/// Argon2id hasher. Work runs on the blocking pool so request tasks never
/// stall the async executor.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Hash verified against when no account matches
    dummy: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    /// OWASP minimum memory cost: 19 MiB
    const MEMORY_COST: u32 = 19_456;
    const TIME_COST: u32 = 2;
    const PARALLELISM: u32 = 1;
    const OUTPUT_LEN: usize = 32;

    pub fn new() -> Self {
        Self::with_params(Self::MEMORY_COST, Self::TIME_COST, Self::PARALLELISM)
    }

    /// Custom cost parameters; invalid values fall back to the argon2 defaults.
    pub fn with_params(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        let params = Params::new(memory_cost, time_cost, parallelism, Some(Self::OUTPUT_LEN))
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid Argon2 parameters, using defaults");
                Params::default()
            });
        Self {
            params,
            dummy: Arc::new(OnceCell::new()),
        }
    }

    /// Hash a password into a PHC string
    pub async fn hash(&self, password: String) -> Result<String> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
        })
        .await
        .map_err(|e| Error::Internal(format!("password hash task failed: {}", e)))?
        .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))
    }

    /// Check a password against a stored PHC string
    pub async fn verify(&self, password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| Error::Internal(format!("stored password hash is invalid: {}", e)))?;
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok())
        })
        .await
        .map_err(|e| Error::Internal(format!("password verify task failed: {}", e)))?
    }

    /// Burn one verification for an unknown account. Always `false`.
    pub async fn verify_absent(&self, password: String) -> Result<bool> {
        let dummy = self
            .dummy
            .get_or_try_init(|| self.hash("jobtrack-absent-account".to_string()))
            .await?
            .clone();
        self.verify(password, dummy).await?;
        Ok(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
