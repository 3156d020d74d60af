//! Shared utilities, configuration, and error handling for Jobtrack
//!
//! This crate provides common functionality used across the Jobtrack service:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Database connection and migrations
//! - Request extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::{Config, LogFormat, RateLimitConfig};
pub use db::{connect, connect_lazy, DatabaseOptions, RepositoryError, MIGRATOR};
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
