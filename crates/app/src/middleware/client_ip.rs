//! Client address resolution behind reverse proxies

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Key used when no address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Number of reverse proxies whose `X-Forwarded-For` entries are trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustProxy {
    pub hops: usize,
}

impl TrustProxy {
    pub fn new(hops: usize) -> Self {
        Self { hops }
    }
}

/// Resolved client address, stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

/// Pick the client address out of the socket peer and forwarding chain.
///
/// The chain is the peer followed by the `X-Forwarded-For` entries read
/// right to left; the address `hops` steps into it is the client. Asking
/// for more hops than the chain holds yields its last (leftmost) entry.
pub fn resolve_client_ip(peer: Option<SocketAddr>, headers: &HeaderMap, hops: usize) -> String {
    let mut chain = vec![peer
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())];

    if hops > 0 {
        let forwarded = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        chain.extend(forwarded.into_iter().rev());
    }

    let index = hops.min(chain.len() - 1);
    chain.swap_remove(index)
}

/// Resolve the client address once and expose it as a [`ClientIp`] extension.
pub async fn client_ip(
    State(trust): State<TrustProxy>,
    mut request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let ip = resolve_client_ip(peer, request.headers(), trust.hops);
    request.extensions_mut().insert(ClientIp(ip));

    next.run(request).await
}
