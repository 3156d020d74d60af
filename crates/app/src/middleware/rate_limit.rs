//! Fixed-window rate limiting keyed by client address

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jobtrack_common::{Error, RateLimitConfig};
use tokio::{sync::RwLock, task::JoinHandle, time::Instant};

use super::client_ip::{ClientIp, UNKNOWN_CLIENT};

#[derive(Debug, Clone, Copy)]
struct Window {
    hits: u32,
    reset_at: Instant,
}

type Windows = RwLock<HashMap<String, Window>>;

/// Outcome of counting one request against its window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, rounded up
    pub fn reset_secs(&self) -> u64 {
        self.reset_after.as_secs() + u64::from(self.reset_after.subsec_nanos() > 0)
    }

    fn apply_headers(&self, headers: &mut HeaderMap) {
        headers.insert("x-ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(self.remaining));
        headers.insert("x-ratelimit-reset", HeaderValue::from(self.reset_secs()));
    }
}

/// Rate limiter state shared by every request in the process
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<Windows>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Count one request for `key` and decide whether it may proceed.
    pub async fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.write().await;

        let window = windows.entry(key.to_string()).or_insert(Window {
            hits: 0,
            reset_at: now + self.config.window,
        });
        if now >= window.reset_at {
            *window = Window {
                hits: 0,
                reset_at: now + self.config.window,
            };
        }
        window.hits = window.hits.saturating_add(1);

        let limit = self.config.max_requests;
        RateLimitDecision {
            allowed: window.hits <= limit,
            limit,
            remaining: limit.saturating_sub(window.hits),
            reset_after: window.reset_at.saturating_duration_since(now),
        }
    }

    /// Number of clients currently tracked
    pub async fn tracked_clients(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Drop every window that has already expired.
    pub async fn prune(&self) -> usize {
        prune_expired(&self.windows).await
    }

    /// Start the periodic pruning task.
    ///
    /// The task holds only a weak handle and exits once the limiter is gone.
    pub fn spawn_cleanup(&self) -> JoinHandle<()> {
        let windows: Weak<Windows> = Arc::downgrade(&self.windows);
        let period = self.config.cleanup_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(windows) = windows.upgrade() else {
                    break;
                };
                let removed = prune_expired(&windows).await;
                if removed > 0 {
                    tracing::debug!(removed, "Rate limiter cleanup: pruned expired windows");
                }
            }
        })
    }
}

async fn prune_expired(windows: &Windows) -> usize {
    let now = Instant::now();
    let mut windows = windows.write().await;
    let before = windows.len();
    windows.retain(|_, window| window.reset_at > now);
    before - windows.len()
}

/// Rate limiting middleware
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = request
        .extensions()
        .get::<ClientIp>()
        .map(|ClientIp(ip)| ip.clone())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    let decision = limiter.check(&key).await;

    if !decision.allowed {
        tracing::warn!(
            client = %key,
            retry_after = decision.reset_secs(),
            "Rate limit exceeded"
        );

        let mut response = Error::RateLimit(
            "Too many requests from this IP, please try again later".to_string(),
        )
        .into_response();
        let headers = response.headers_mut();
        decision.apply_headers(headers);
        headers.insert(RETRY_AFTER, HeaderValue::from(decision.reset_secs()));
        return response;
    }

    let mut response = next.run(request).await;
    decision.apply_headers(response.headers_mut());
    response
}
