//! Request logging middleware
//!
//! Emits one structured line per request with method, path, status, and
//! latency. Query strings are truncated so pathological URLs cannot flood
//! the logs, and credential-looking parameters are redacted.

use axum::{body::Body, extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Maximum length for a logged query string before truncation
const MAX_QUERY_LENGTH: usize = 120;

/// Truncation suffix for long query strings
const TRUNCATION_SUFFIX: &str = "...";

/// Log every request on its way out.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(sanitize_query);

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();

    match query {
        Some(query) => tracing::info!(
            %method,
            %path,
            %query,
            status = status.as_u16(),
            latency_ms,
            "request"
        ),
        None => tracing::info!(
            %method,
            %path,
            status = status.as_u16(),
            latency_ms,
            "request"
        ),
    }

    response
}

/// Redact credential-looking parameters and cap the overall length.
fn sanitize_query(query: &str) -> String {
    let redacted: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive_parameter(key) => format!("{key}=[REDACTED]"),
            _ => pair.to_string(),
        })
        .collect();

    truncate(&redacted.join("&"), MAX_QUERY_LENGTH)
}

fn truncate(input: &str, max_length: usize) -> String {
    if input.len() <= max_length {
        input.to_string()
    } else {
        let cut = max_length.saturating_sub(TRUNCATION_SUFFIX.len());
        let mut end = cut;
        while !input.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}{}", &input[..end], TRUNCATION_SUFFIX)
    }
}

fn is_sensitive_parameter(key: &str) -> bool {
    let sensitive = ["password", "token", "secret", "key", "auth", "credential"];
    let key_lower = key.to_lowercase();
    sensitive.iter().any(|s| key_lower.contains(s))
}
