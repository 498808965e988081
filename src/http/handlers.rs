//! Device API handlers.
//!
//! Routes accept any method and reject the wrong one themselves so that the
//! error comes back as the JSON 400 body instead of axum's 405.

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    Json,
};

use crate::devices::{validate_device, validate_serial_num, Device};
use crate::http::response::ApiError;
use crate::http::server::AppState;

pub const HEADER_SERIAL_NUM: &str = "serialnum";
pub const HEADER_MODEL: &str = "model";
pub const HEADER_IP: &str = "ip";

pub async fn get_device(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Device>, ApiError> {
    expect_method(&method, Method::GET)?;
    let serial_num = header_value(&headers, HEADER_SERIAL_NUM);
    validate_serial_num(&serial_num)?;

    let device = state.devices.get_device(&serial_num)?;
    tracing::debug!(
        serial_num = %device.serial_num,
        model = %device.model,
        ip = %device.ip,
        "Device found"
    );
    Ok(Json(device))
}

pub async fn create_device(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Device>, ApiError> {
    expect_method(&method, Method::POST)?;
    let device = device_from_headers(&headers);
    validate_device(&device)?;

    state.devices.create_device(device.clone())?;
    Ok(Json(device))
}

pub async fn update_device(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Device>, ApiError> {
    expect_method(&method, Method::PUT)?;
    let device = device_from_headers(&headers);
    validate_device(&device)?;

    state.devices.update_device(device.clone())?;
    Ok(Json(device))
}

pub async fn delete_device(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    expect_method(&method, Method::DELETE)?;
    let serial_num = header_value(&headers, HEADER_SERIAL_NUM);
    validate_serial_num(&serial_num)?;

    state.devices.delete_device(&serial_num)?;
    Ok(StatusCode::OK)
}

fn expect_method(actual: &Method, expected: Method) -> Result<(), ApiError> {
    if *actual == expected {
        Ok(())
    } else {
        Err(ApiError::InvalidMethod)
    }
}

/// Missing or non-UTF-8 headers read as empty.
fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn device_from_headers(headers: &HeaderMap) -> Device {
    Device::new(
        header_value(headers, HEADER_SERIAL_NUM),
        header_value(headers, HEADER_MODEL),
        header_value(headers, HEADER_IP),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::devices::MemoryStore;
    use crate::http::response::ErrorBody;
    use crate::http::server::HttpServer;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        let mut config = ServiceConfig::default();
        config.auth.enabled = false;
        HttpServer::with_store(config, Arc::new(MemoryStore::new())).router()
    }

    fn request(method: Method, uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in fields {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn error_message(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice::<ErrorBody>(&bytes).unwrap().message
    }

    const FULL: [(&str, &str); 3] = [("serialNum", "abc123"), ("model", "X1"), ("ip", "10.0.0.1")];

    #[tokio::test]
    async fn test_create_then_get() {
        let app = app();

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/createDevice", &FULL))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request(Method::GET, "/getDevice", &[("serialNum", "abc123")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let device: Device = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(device, Device::new("abc123", "X1", "10.0.0.1"));
    }

    #[tokio::test]
    async fn test_wrong_method_is_bad_request() {
        let response = app()
            .oneshot(request(Method::POST, "/getDevice", &[("serialNum", "abc123")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(response).await, "invalid http method");
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let app = app();

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/getDevice", &[("serialNum", "ab")]))
            .await
            .unwrap();
        assert_eq!(
            error_message(response).await,
            "serialNum should be at least 3 characters long"
        );

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/createDevice",
                &[("serialNum", "abc123"), ("model", "X1")],
            ))
            .await
            .unwrap();
        assert_eq!(error_message(response).await, "field cannot be empty");

        let response = app
            .oneshot(request(
                Method::PUT,
                "/updateDevice",
                &[("serialNum", "abc123"), ("model", "X1"), ("ip", "10.0.0")],
            ))
            .await
            .unwrap();
        assert_eq!(error_message(response).await, "IP field is in wrong format");
    }

    #[tokio::test]
    async fn test_store_errors() {
        let app = app();

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, "/deleteDevice", &[("serialNum", "abc123")]))
            .await
            .unwrap();
        assert_eq!(error_message(response).await, "there is no such device");

        app.clone()
            .oneshot(request(Method::POST, "/createDevice", &FULL))
            .await
            .unwrap();
        let response = app
            .oneshot(request(Method::POST, "/createDevice", &FULL))
            .await
            .unwrap();
        assert_eq!(error_message(response).await, "such device is already in database");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = app();
        app.clone()
            .oneshot(request(Method::POST, "/createDevice", &FULL))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request(
                Method::PUT,
                "/updateDevice",
                &[("serialNum", "abc123"), ("model", "X2"), ("ip", "::1")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, "/deleteDevice", &[("serialNum", "abc123")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request(Method::GET, "/getDevice", &[("serialNum", "abc123")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
