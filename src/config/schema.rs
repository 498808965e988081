//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resilience::BreakerSettings;

/// Root configuration for the device registry service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Inbound HTTP server settings.
    pub http_server: HttpServerConfig,

    /// Outbound HTTP client settings.
    pub http_client: HttpClientConfig,

    /// Circuit breaker guarding outbound calls.
    pub breaker: BreakerConfig,

    /// Basic-auth stub for the device API.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Inbound server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpServerConfig {
    /// Total time allowed to serve one request, in seconds.
    pub timeout_secs: u64,

    /// Maximum buffered body size when logging error responses.
    pub body_limit_bytes: usize,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 4,
            body_limit_bytes: 64 * 1024,
        }
    }
}

/// Outbound client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Total time allowed for one outbound call, in seconds.
    pub timeout_secs: u64,

    /// Maximum response body size the transport will buffer.
    pub max_response_bytes: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_response_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

impl HttpClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Name used in logs and metrics.
    pub name: String,

    /// Consecutive failures tolerated before the circuit opens.
    pub failure_threshold: u32,

    /// Seconds the circuit stays open before a trial call.
    pub cool_down_secs: u64,

    /// Count 4xx responses as failures (5xx always count).
    pub count_client_errors: bool,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            name: "outbound-http".to_string(),
            failure_threshold: 3,
            cool_down_secs: 5,
            count_client_errors: false,
        }
    }
}

impl BreakerConfig {
    pub fn settings(&self) -> BreakerSettings {
        BreakerSettings {
            name: self.name.clone(),
            failure_threshold: self.failure_threshold,
            cool_down: Duration::from_secs(self.cool_down_secs),
        }
    }
}

/// Basic-auth stub configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require credentials on device routes.
    pub enabled: bool,

    pub username: String,

    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // WARNING: This is a placeholder! Change this in production.
            username: "user".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
