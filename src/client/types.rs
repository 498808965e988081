//! Request, response and error types shared by every pipeline stage.

use axum::body::Bytes;
use axum::http::{Request, Response, StatusCode};
use thiserror::Error;

/// A fully buffered outbound request.
pub type OutboundRequest = Request<Bytes>;

/// A fully buffered response handed back up the chain.
pub type OutboundResponse = Response<Bytes>;

pub type ClientResult = Result<OutboundResponse, ClientError>;

/// Failures surfaced by [`Client::call`](crate::client::Client::call).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure, including the client timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response status was classified as a failure.
    #[error("server error: {status}")]
    ServerStatus { status: StatusCode },

    /// The breaker rejected the call without attempting it.
    #[error("circuit breaker '{name}' is open")]
    CircuitOpen { name: String },

    /// The request cannot be sent as built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Reject requests no transport could send. Runs ahead of the breaker so
/// caller mistakes never count as dependency failures.
pub(crate) fn ensure_absolute(request: &OutboundRequest) -> Result<(), ClientError> {
    let uri = request.uri();
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(ClientError::InvalidRequest(format!("'{}' is not an absolute URI", uri)));
    }
    Ok(())
}

impl ClientError {
    /// True when the error came from the breaker rather than the call.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, ClientError::CircuitOpen { .. })
    }
}
