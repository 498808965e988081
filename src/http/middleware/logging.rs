//! Request/response logging for the device API.
//!
//! Logs method, endpoint, headers and query on the way in, then status and
//! headers on the way out. Error bodies are buffered (up to the configured
//! limit) so they can be logged, then handed back unchanged.

use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::logging::Redacted;
use crate::observability::metrics;

const ROUTES: [&str; 4] = ["/getDevice", "/createDevice", "/updateDevice", "/deleteDevice"];

pub async fn logging_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let endpoint = request.uri().path().to_string();
    let request_id = request.request_id().to_string();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        endpoint = %endpoint,
        headers = ?Redacted(request.headers()),
        query = request.uri().query().unwrap_or(""),
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status();
    metrics::record_request(method.as_str(), route_label(&endpoint), status.as_u16(), start);

    if status.is_success() {
        tracing::info!(
            request_id = %request_id,
            status = status.as_u16(),
            headers = ?Redacted(response.headers()),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Outgoing response"
        );
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, state.body_limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to buffer error body");
            Default::default()
        }
    };

    tracing::warn!(
        request_id = %request_id,
        status = parts.status.as_u16(),
        headers = ?Redacted(&parts.headers),
        body = %String::from_utf8_lossy(&bytes),
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Outgoing error response"
    );

    Response::from_parts(parts, Body::from(bytes))
}

/// Bound metric cardinality to the known routes.
fn route_label(path: &str) -> &'static str {
    ROUTES.iter().copied().find(|r| *r == path).unwrap_or("other")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label() {
        assert_eq!(route_label("/getDevice"), "/getDevice");
        assert_eq!(route_label("/wp-admin"), "other");
    }
}
