//! Chain-of-responsibility plumbing.
//!
//! Every stage implements [`Interceptor`] and receives a [`Next`] handle
//! for the rest of the chain. The chain ends at a [`Transport`].

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::Instrument;

use crate::client::types::{ClientResult, OutboundRequest};

/// The capability that actually puts a request on the wire.
pub trait Transport: Send + Sync {
    fn send(&self, request: OutboundRequest) -> BoxFuture<'_, ClientResult>;
}

/// One stage of the outbound pipeline.
///
/// An interceptor may inspect the request, forward it with
/// `next.run(request)`, or answer on its own without forwarding.
pub trait Interceptor: Send + Sync {
    fn intercept<'a>(&'a self, request: OutboundRequest, next: Next<'a>) -> BoxFuture<'a, ClientResult>;
}

/// The remainder of the chain after the current stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Arc<dyn Interceptor>], transport: &'a dyn Transport) -> Self {
        Self { chain, transport }
    }

    /// Pass the request to the next stage, or the transport if none remain.
    pub fn run(self, request: OutboundRequest) -> BoxFuture<'a, ClientResult> {
        match self.chain.split_first() {
            Some((stage, rest)) => stage.intercept(request, Next::new(rest, self.transport)),
            None => self.transport.send(request),
        }
    }
}

/// A caller-supplied interceptor spliced in front of the built-in stages.
pub struct UserInterceptor {
    label: String,
    inner: Arc<dyn Interceptor>,
}

impl UserInterceptor {
    pub fn new(label: impl Into<String>, inner: Arc<dyn Interceptor>) -> Self {
        Self {
            label: label.into(),
            inner,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Interceptor for UserInterceptor {
    fn intercept<'a>(&'a self, request: OutboundRequest, next: Next<'a>) -> BoxFuture<'a, ClientResult> {
        let span = tracing::debug_span!("user_interceptor", label = %self.label);
        Box::pin(self.inner.intercept(request, next).instrument(span))
    }
}
