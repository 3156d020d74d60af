//! Request pipeline stages
//!
//! Each stage is a plain `axum::middleware::from_fn` function (or a
//! `tower-http` layer) so the composition root controls the order in one
//! place.

mod client_ip;
mod cors;
mod rate_limit;
mod sanitize;
mod security_headers;

pub use client_ip::{client_ip, resolve_client_ip, ClientIp, TrustProxy, UNKNOWN_CLIENT};
pub use cors::cors_layer;
pub use rate_limit::{rate_limit, RateLimitDecision, RateLimiter};
pub use sanitize::{sanitize_input, sanitize_str, sanitize_value, BodyLimit};
pub use security_headers::{security_headers, SECURITY_HEADERS};
