//! Pipeline composition.
//!
//! # Call path
//! ```text
//! Client::call
//!     → user interceptors (in the order they were added)
//!     → breaker stage (fail fast when open, map 5xx to failures)
//!     → logging stage
//!     → transport
//! ```
//!
//! The chain is assembled once by [`ClientBuilder::build`] and never changes
//! afterwards. [`Client`] is a cheap handle that can be cloned into every
//! task that needs to call out.

use std::any::type_name;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::Request;

use crate::client::breaker::{BreakerInterceptor, FailurePolicy};
use crate::client::interceptor::{Interceptor, Next, Transport, UserInterceptor};
use crate::client::logging::LoggingInterceptor;
use crate::client::transport::HyperTransport;
use crate::client::types::{ClientError, ClientResult, OutboundRequest};
use crate::config::{BreakerConfig, HttpClientConfig};
use crate::resilience::{BreakerSettings, CircuitBreaker, Clock, SystemClock};

struct ClientInner {
    chain: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
    breaker: Arc<CircuitBreaker>,
}

/// Outbound HTTP client with interceptors and circuit breaking.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Send a request through the full pipeline.
    pub async fn call(&self, request: OutboundRequest) -> ClientResult {
        Next::new(&self.inner.chain, self.inner.transport.as_ref())
            .run(request)
            .await
    }

    /// Convenience wrapper for a bodiless GET.
    pub async fn get(&self, uri: &str) -> ClientResult {
        let request = Request::get(uri)
            .body(Bytes::new())
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        self.call(request).await
    }

    /// The breaker owned by this pipeline.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.inner.breaker
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    interceptors: Vec<UserInterceptor>,
    breaker: BreakerSettings,
    policy: FailurePolicy,
    clock: Arc<dyn Clock>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            transport: None,
            interceptors: Vec::new(),
            breaker: BreakerSettings::default(),
            policy: FailurePolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Start from service configuration: real transport plus breaker tuning.
    pub fn from_config(client: &HttpClientConfig, breaker: &BreakerConfig) -> Self {
        Self::new()
            .transport(HyperTransport::new(client))
            .breaker(breaker.settings())
            .failure_policy(FailurePolicy {
                count_client_errors: breaker.count_client_errors,
            })
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Append a user interceptor. Interceptors run in the order added, all
    /// of them ahead of the breaker and logging stages.
    pub fn interceptor<I: Interceptor + 'static>(self, interceptor: I) -> Self {
        self.shared_interceptor(type_name::<I>(), Arc::new(interceptor))
    }

    /// Append an already shared interceptor under an explicit label.
    pub fn shared_interceptor(mut self, label: impl Into<String>, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(UserInterceptor::new(label, interceptor));
        self
    }

    pub fn breaker(mut self, settings: BreakerSettings) -> Self {
        self.breaker = settings;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Client {
        let breaker = Arc::new(CircuitBreaker::with_clock(self.breaker, self.clock));
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HyperTransport::default()));

        let labels: Vec<&str> = self.interceptors.iter().map(UserInterceptor::label).collect();
        tracing::debug!(
            breaker = %breaker.name(),
            user_interceptors = ?labels,
            "Client pipeline built"
        );

        let mut chain: Vec<Arc<dyn Interceptor>> = self
            .interceptors
            .into_iter()
            .map(|i| Arc::new(i) as Arc<dyn Interceptor>)
            .collect();
        chain.push(Arc::new(BreakerInterceptor::new(breaker.clone(), self.policy)));
        chain.push(Arc::new(LoggingInterceptor));

        Client {
            inner: Arc::new(ClientInner {
                chain,
                transport,
                breaker,
            }),
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
