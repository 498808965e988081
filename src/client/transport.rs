//! Real network transport backed by the hyper-util connection pool.

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::Body;
use axum::http::Response;
use futures_util::future::BoxFuture;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::client::interceptor::Transport;
use crate::client::types::{ensure_absolute, ClientError, ClientResult, OutboundRequest, OutboundResponse};
use crate::config::HttpClientConfig;

/// Plain-HTTP transport with a whole-call deadline.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    max_response_bytes: usize,
}

impl HyperTransport {
    pub fn new(config: &HttpClientConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            timeout: config.timeout(),
            max_response_bytes: config.max_response_bytes,
        }
    }

    async fn round_trip(&self, request: OutboundRequest) -> ClientResult {
        let response = self
            .client
            .request(request.map(Body::from))
            .await
            .map_err(|e| ClientError::Transport(error_chain(&e)))?;

        let (parts, body) = response.into_parts();
        let bytes = self.collect(body).await?;
        Ok(Response::from_parts(parts, bytes))
    }

    async fn collect(&self, body: Incoming) -> Result<axum::body::Bytes, ClientError> {
        axum::body::to_bytes(Body::new(body), self.max_response_bytes)
            .await
            .map_err(|e| ClientError::Transport(format!("failed to read response body: {}", e)))
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new(&HttpClientConfig::default())
    }
}

impl Transport for HyperTransport {
    fn send(&self, request: OutboundRequest) -> BoxFuture<'_, Result<OutboundResponse, ClientError>> {
        Box::pin(async move {
            ensure_absolute(&request)?;

            match time::timeout(self.timeout, self.round_trip(request)).await {
                Ok(result) => result,
                Err(_) => Err(ClientError::Transport(format!(
                    "request timed out after {:?}",
                    self.timeout
                ))),
            }
        })
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
