//! Outbound HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → interceptor.rs (user interceptors, in insertion order)
//!     → breaker.rs (circuit breaker gate + status classification)
//!     → logging.rs (request/response metadata)
//!     → transport.rs (hyper-util connection pool)
//! ```
//!
//! # Design Decisions
//! - Each stage holds nothing but a `Next` handle to the rest of the chain
//! - The chain is fixed at build time and shared by every clone of `Client`
//! - Bodies are buffered so stages can inspect them without consuming them

pub mod breaker;
pub mod interceptor;
pub mod logging;
pub mod pipeline;
pub mod transport;
pub mod types;

pub use breaker::FailurePolicy;
pub use interceptor::{Interceptor, Next, Transport};
pub use pipeline::{Client, ClientBuilder};
pub use transport::HyperTransport;
pub use types::{ClientError, ClientResult, OutboundRequest, OutboundResponse};
