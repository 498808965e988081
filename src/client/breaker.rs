//! Breaker stage.
//!
//! Runs the rest of the chain inside the pipeline's [`CircuitBreaker`].
//! Statuses the [`FailurePolicy`] rejects are turned into
//! [`ClientError::ServerStatus`] before the breaker sees the outcome.

use std::sync::Arc;

use axum::http::StatusCode;
use futures_util::future::BoxFuture;

use crate::client::interceptor::{Interceptor, Next};
use crate::client::types::{ensure_absolute, ClientError, ClientResult, OutboundRequest};
use crate::resilience::{BreakerError, CircuitBreaker};

/// Decides which response statuses count as breaker failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailurePolicy {
    /// Also count 4xx statuses. 5xx statuses always count.
    pub count_client_errors: bool,
}

impl FailurePolicy {
    pub fn is_failure(&self, status: StatusCode) -> bool {
        status.is_server_error() || (self.count_client_errors && status.is_client_error())
    }
}

pub struct BreakerInterceptor {
    breaker: Arc<CircuitBreaker>,
    policy: FailurePolicy,
}

impl BreakerInterceptor {
    pub fn new(breaker: Arc<CircuitBreaker>, policy: FailurePolicy) -> Self {
        Self { breaker, policy }
    }
}

impl Interceptor for BreakerInterceptor {
    fn intercept<'a>(&'a self, request: OutboundRequest, next: Next<'a>) -> BoxFuture<'a, ClientResult> {
        Box::pin(async move {
            ensure_absolute(&request)?;
            let policy = self.policy;
            let result = self
                .breaker
                .execute(move || async move {
                    let response = next.run(request).await?;
                    let status = response.status();
                    if policy.is_failure(status) {
                        return Err(ClientError::ServerStatus { status });
                    }
                    Ok::<_, ClientError>(response)
                })
                .await;

            result.map_err(|e| match e {
                BreakerError::Open => ClientError::CircuitOpen {
                    name: self.breaker.name().to_string(),
                },
                BreakerError::Operation(e) => e,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_ignores_client_errors() {
        let policy = FailurePolicy::default();
        assert!(policy.is_failure(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(policy.is_failure(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!policy.is_failure(StatusCode::NOT_FOUND));
        assert!(!policy.is_failure(StatusCode::OK));
    }

    #[test]
    fn test_strict_policy_counts_client_errors() {
        let policy = FailurePolicy {
            count_client_errors: true,
        };
        assert!(policy.is_failure(StatusCode::TOO_MANY_REQUESTS));
        assert!(!policy.is_failure(StatusCode::MOVED_PERMANENTLY));
    }
}
