//! Basic-auth stub.
//!
//! Compares `Authorization: Basic ...` credentials against the configured
//! username and password. Passthrough when auth is disabled.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::config::AuthConfig;
use crate::http::server::AppState;

pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.auth.enabled {
        return next.run(request).await;
    }

    if authorized(request.headers(), &state.auth) {
        return next.run(request).await;
    }

    tracing::warn!(
        method = %request.method(),
        endpoint = %request.uri().path(),
        "Rejected request with missing or invalid credentials"
    );
    unauthorized()
}

fn authorized(headers: &HeaderMap, auth: &AuthConfig) -> bool {
    match credentials(headers) {
        Some((username, password)) => username == auth.username && password == auth.password,
        None => false,
    }
}

/// Extract `(username, password)` from a basic `Authorization` header.
fn credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    let mut response = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"device-registry\""),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user: &str, pass: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let token = STANDARD.encode(format!("{}:{}", user, pass));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_credentials_decode() {
        let headers = basic("user", "pa:ss");
        assert_eq!(
            credentials(&headers),
            Some(("user".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn test_authorized_matches_config() {
        let auth = AuthConfig::default();
        assert!(authorized(&basic("user", "password"), &auth));
        assert!(!authorized(&basic("user", "wrong"), &auth));
        assert!(!authorized(&HeaderMap::new(), &auth));
    }

    #[test]
    fn test_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(credentials(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!"));
        assert_eq!(credentials(&headers), None);
    }
}
