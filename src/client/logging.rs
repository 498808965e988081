//! Logging stage.
//!
//! Records the outbound request before the call and the response (or
//! failure) after it. Never touches the request, response or error.

use std::time::Instant;

use futures_util::future::BoxFuture;

use crate::client::interceptor::{Interceptor, Next};
use crate::client::types::{ClientResult, OutboundRequest};
use crate::observability::logging::Redacted;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn intercept<'a>(&'a self, request: OutboundRequest, next: Next<'a>) -> BoxFuture<'a, ClientResult> {
        Box::pin(async move {
            let method = request.method().clone();
            let uri = request.uri().clone();
            tracing::info!(
                method = %method,
                uri = %uri,
                headers = ?Redacted(request.headers()),
                "Outgoing request"
            );

            let start = Instant::now();
            let result = next.run(request).await;
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(response) => {
                    tracing::info!(
                        method = %method,
                        uri = %uri,
                        status = %response.status(),
                        headers = ?Redacted(response.headers()),
                        elapsed_ms,
                        "Incoming response"
                    );
                    metrics::record_outbound(method.as_str(), response.status().as_str(), start);
                }
                Err(e) => {
                    tracing::warn!(
                        method = %method,
                        uri = %uri,
                        error = %e,
                        elapsed_ms,
                        "Error in response"
                    );
                    metrics::record_outbound(method.as_str(), "error", start);
                }
            }

            result
        })
    }
}
