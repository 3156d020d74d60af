//! Database connector and shared repository types
//!
//! Opens the process-wide connection pool and carries the embedded schema
//! migrations. Repositories in the domain crates clone the pool handle.

use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

use crate::error::Error;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Pool settings for [`connect`]
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl DatabaseOptions {
    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Open a connection pool and verify the database is reachable.
pub async fn connect(url: &str, options: &DatabaseOptions) -> Result<PgPool, sqlx::Error> {
    let pool = options.pool_options().connect(url).await?;
    tracing::debug!(
        max_connections = options.max_connections,
        "Database pool established"
    );
    Ok(pool)
}

/// Build a pool that connects on first use.
///
/// Only the URL is validated; nothing touches the network.
pub fn connect_lazy(url: &str, options: &DatabaseOptions) -> Result<PgPool, sqlx::Error> {
    options.pool_options().connect_lazy(url)
}

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record already exists")]
    AlreadyExists,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Classify a driver error, surfacing unique-constraint violations.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::AlreadyExists,
            _ => RepositoryError::Connection(err),
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AlreadyExists => Error::Conflict("Record already exists".to_string()),
            RepositoryError::Connection(e) => Error::Database(e),
        }
    }
}
