//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::time::Duration;

/// Default listener port
const DEFAULT_PORT: u16 = 3000;

/// Default token lifetime
const DEFAULT_JWT_LIFETIME: &str = "30d";

/// Upper bound for any configured duration: ten years
pub const MAX_DURATION: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Fixed-window rate limit settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Length of one counting window
    pub window: Duration,
    /// Requests allowed per client within one window
    pub max_requests: u32,
    /// How often expired windows are pruned
    pub cleanup_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(15 * 60),
            max_requests: 100,
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Token signing
    pub jwt_secret: String,
    pub jwt_lifetime: Duration,

    /// Request pipeline
    pub rate_limit: RateLimitConfig,
    pub trust_proxy_hops: usize,
    /// Allowed CORS origins; `None` keeps the permissive default
    pub cors_allowed_origins: Option<Vec<String>>,
    pub body_limit_bytes: usize,

    /// Database pool
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("MONGO_URI"))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL (or MONGO_URI) is required"))?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET is required"))?;

        let jwt_lifetime = parse_duration(
            &lookup("JWT_LIFETIME").unwrap_or_else(|| DEFAULT_JWT_LIFETIME.to_string()),
        )
        .context("JWT_LIFETIME is invalid")?;

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            window: match lookup("RATE_LIMIT_WINDOW_SECS") {
                Some(v) => bounded(Duration::from_secs(
                    v.trim()
                        .parse()
                        .context("RATE_LIMIT_WINDOW_SECS must be a number of seconds")?,
                ))
                .context("RATE_LIMIT_WINDOW_SECS is invalid")?,
                None => defaults.window,
            },
            max_requests: parse_or("RATE_LIMIT_MAX", &lookup, defaults.max_requests)?,
            cleanup_interval: defaults.cleanup_interval,
        };

        let config = Self {
            database_url,
            jwt_secret,
            jwt_lifetime,
            rate_limit,
            trust_proxy_hops: parse_or("TRUST_PROXY_HOPS", &lookup, 1)?,
            cors_allowed_origins: parse_origins(lookup("CORS_ALLOWED_ORIGINS").as_deref()),
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", &lookup, 100 * 1024)?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", &lookup, 10)?,
            db_connect_timeout: Duration::from_secs(parse_or(
                "DB_CONNECT_TIMEOUT_SECS",
                &lookup,
                10,
            )?),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            port: parse_or("PORT", &lookup, DEFAULT_PORT)?,
        };

        Ok(config)
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

/// Parse a comma-separated origin list. `*` means any origin.
pub fn parse_origins(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "*" {
        return None;
    }
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}

/// Parse a duration such as `30d`, `12h`, `90m`, `45s` or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| anyhow!("invalid duration: {:?}", raw))?;
    let multiplier = match unit {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        other => return Err(anyhow!("unknown duration unit {:?}", other)),
    };

    let secs = value
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow!("duration {:?} is too large", raw))?;
    bounded(Duration::from_secs(secs))
}

fn bounded(duration: Duration) -> Result<Duration> {
    if duration.is_zero() {
        return Err(anyhow!("duration must be positive"));
    }
    if duration > MAX_DURATION {
        return Err(anyhow!(
            "duration must not exceed {} seconds",
            MAX_DURATION.as_secs()
        ));
    }
    Ok(duration)
}
