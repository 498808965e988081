//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call:
//!     → circuit_breaker.rs (admit, run, record outcome)
//!     → clock.rs (elapsed time since the circuit opened)
//! ```
//!
//! # Design Decisions
//! - No implicit retries; callers wrap retries themselves
//! - Timeouts belong to the transport and surface as ordinary failures
//! - The breaker is generic over the wrapped operation's result type

pub mod circuit_breaker;
pub mod clock;

pub use circuit_breaker::{BreakerError, BreakerSettings, BreakerState, CircuitBreaker};
pub use clock::{Clock, ManualClock, SystemClock};
