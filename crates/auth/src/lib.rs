//! Authentication for the Jobtrack API
//!
//! Provides JWT issuing and validation, password hashing, the
//! `require_auth` middleware guarding protected routers, and the
//! `AuthUser` extractor reading the identity it resolves.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod middleware;
mod password;

pub use backend::AuthBackend;
pub use claims::Claims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use middleware::require_auth;
pub use password::PasswordHasher;
