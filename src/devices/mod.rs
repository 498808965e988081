//! Device registry domain.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → validate.rs (field rules)
//!     → service.rs (application layer)
//!     → store.rs (DeviceStore: in-memory DashMap)
//! ```

pub mod model;
pub mod service;
pub mod store;
pub mod validate;

pub use model::Device;
pub use service::DeviceService;
pub use store::{DeviceStore, MemoryStore, StoreError};
pub use validate::{validate_device, validate_serial_num, DeviceValidationError};
