//! Error responses for the device API.
//!
//! Every handler failure becomes `400 Bad Request` with a JSON body
//! `{"message": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::devices::{DeviceValidationError, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid http method")]
    InvalidMethod,

    #[error(transparent)]
    Validation(#[from] DeviceValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
