//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): inbound requests by method, route, status
//! - `http_request_duration_seconds` (histogram): inbound latency
//! - `outbound_requests_total` (counter): outbound calls by method, outcome
//! - `outbound_request_duration_seconds` (histogram): outbound latency
//! - `circuit_breaker_transitions_total` (counter): by breaker, from, to
//! - `circuit_breaker_rejections_total` (counter): calls failed fast
//! - `circuit_breaker_state` (gauge): 0=closed, 1=open, 2=half-open
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::BreakerState;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a served inbound request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels[..]).increment(1);
    histogram!("http_request_duration_seconds", &labels[..]).record(start.elapsed().as_secs_f64());
}

/// Record an outbound call that reached the transport.
pub fn record_outbound(method: &str, outcome: &str, start: Instant) {
    let labels = [("method", method.to_string()), ("outcome", outcome.to_string())];
    counter!("outbound_requests_total", &labels[..]).increment(1);
    histogram!("outbound_request_duration_seconds", &labels[..]).record(start.elapsed().as_secs_f64());
}

pub fn record_breaker_transition(breaker: &str, from: BreakerState, to: BreakerState) {
    counter!(
        "circuit_breaker_transitions_total",
        "breaker" => breaker.to_string(),
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
    record_breaker_state(breaker, to);
}

pub fn record_breaker_state(breaker: &str, state: BreakerState) {
    let value = match state {
        BreakerState::Closed => 0.0,
        BreakerState::Open => 1.0,
        BreakerState::HalfOpen => 2.0,
    };
    gauge!("circuit_breaker_state", "breaker" => breaker.to_string()).set(value);
}

pub fn record_breaker_rejection(breaker: &str) {
    counter!("circuit_breaker_rejections_total", "breaker" => breaker.to_string()).increment(1);
}
