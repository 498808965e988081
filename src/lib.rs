//! Device registry service with a resilient outbound HTTP client.
//!
//! # Architecture Overview
//!
//! ```text
//! Inbound:
//!     HTTP request → http (middleware, handlers) → devices (service, store)
//!
//! Outbound:
//!     Client::call
//!         → user interceptors (insertion order)
//!         → breaker stage (resilience::CircuitBreaker)
//!         → logging stage
//!         → Transport (hyper)
//! ```

// Core subsystems
pub mod client;
pub mod config;
pub mod devices;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use client::{Client, ClientBuilder, ClientError, Interceptor, Next, Transport};
pub use config::ServiceConfig;
pub use devices::{Device, DeviceService, MemoryStore};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resilience::{BreakerState, CircuitBreaker};
