//! Inbound middleware for the device API.
//!
//! Applied in this order (outermost first):
//! request ID → trace → timeout → logging → basic auth → handler

pub mod auth;
pub mod logging;

pub use auth::basic_auth_middleware;
pub use logging::logging_middleware;
