//! Inbound device API.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → middleware/ (logging, basic auth)
//!     → handlers.rs (method check, header parsing, validation)
//!     → devices::DeviceService
//!     → response.rs (errors as JSON 400)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
