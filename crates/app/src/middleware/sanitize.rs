//! Input sanitization
//!
//! Every string in the query string and in a JSON body is trimmed and has
//! `<` escaped to `&lt;` before any handler sees it. Requests are rewritten,
//! never rejected, except when the body exceeds the configured limit.
//! A JSON body is re-serialized only when a string actually changed.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, uri::PathAndQuery, HeaderValue, Uri},
    middleware::Next,
    response::Response,
};
use jobtrack_common::Error;
use serde_json::Value;

/// Maximum body size buffered for sanitization
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

/// Sanitize a single string. Applying it twice changes nothing.
pub fn sanitize_str(input: &str) -> String {
    input.trim().replace('<', "&lt;")
}

/// Sanitize every string inside a JSON value, in place.
///
/// Returns whether anything changed.
pub fn sanitize_value(value: &mut Value) -> bool {
    match value {
        Value::String(s) => {
            let cleaned = sanitize_str(s);
            if cleaned == *s {
                return false;
            }
            *s = cleaned;
            true
        }
        Value::Array(items) => items
            .iter_mut()
            .fold(false, |changed, item| sanitize_value(item) | changed),
        Value::Object(map) => map
            .values_mut()
            .fold(false, |changed, item| sanitize_value(item) | changed),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

fn sanitize_query(query: &str) -> String {
    let pairs = url::form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), sanitize_str(&value)));
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn sanitize_uri(uri: &Uri) -> Option<Uri> {
    let query = uri.query()?;
    let cleaned = sanitize_query(query);

    let unchanged = url::form_urlencoded::parse(query.as_bytes())
        .eq(url::form_urlencoded::parse(cleaned.as_bytes()));
    if unchanged {
        return None;
    }

    let path_and_query = format!("{}?{}", uri.path(), cleaned);
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn payload_too_large() -> Error {
    Error::PayloadTooLarge("Request body exceeds the allowed size".to_string())
}

fn declared_length(request: &Request) -> Option<u64> {
    request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Input sanitizer middleware
///
/// Also the body size gate: a declared or streamed body over the limit is
/// refused with 413 before any handler runs.
pub async fn sanitize_input(
    State(BodyLimit(limit)): State<BodyLimit>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    if declared_length(&request).is_some_and(|len| len > limit as u64) {
        return Err(payload_too_large());
    }

    if let Some(uri) = sanitize_uri(request.uri()) {
        *request.uri_mut() = uri;
    }

    let json = is_json(&request);
    let (mut parts, body) = request.into_parts();
    let bytes = to_bytes(body, limit).await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to buffer request body");
        payload_too_large()
    })?;

    // Malformed JSON is left for the handler's extractor to reject.
    let parsed = json
        .then(|| serde_json::from_slice::<Value>(&bytes).ok())
        .flatten();
    let bytes = match parsed {
        Some(mut value) => {
            if sanitize_value(&mut value) {
                let cleaned = serde_json::to_vec(&value)?;
                parts
                    .headers
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(cleaned.len()));
                cleaned.into()
            } else {
                bytes
            }
        }
        None => bytes,
    };

    Ok(next
        .run(Request::from_parts(parts, Body::from(bytes)))
        .await)
}
