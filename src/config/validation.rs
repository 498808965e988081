//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.http_server.timeout_secs == 0 {
        errors.push(ValidationError::new("http_server.timeout_secs", "must be greater than 0"));
    }

    if config.http_client.timeout_secs == 0 {
        errors.push(ValidationError::new("http_client.timeout_secs", "must be greater than 0"));
    }

    if config.http_client.max_response_bytes == 0 {
        errors.push(ValidationError::new(
            "http_client.max_response_bytes",
            "must be greater than 0",
        ));
    }

    if config.breaker.name.trim().is_empty() {
        errors.push(ValidationError::new("breaker.name", "must not be empty"));
    }

    if config.breaker.cool_down_secs == 0 {
        errors.push(ValidationError::new("breaker.cool_down_secs", "must be greater than 0"));
    }

    if config.auth.enabled && config.auth.username.is_empty() {
        errors.push(ValidationError::new(
            "auth.username",
            "must not be empty when auth is enabled",
        ));
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.http_client.timeout_secs = 0;
        config.breaker.cool_down_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "http_client.timeout_secs",
                "breaker.cool_down_secs",
                "observability.log_level",
            ]
        );
    }

    #[test]
    fn test_zero_threshold_is_allowed() {
        // Zero means the first failure opens the circuit.
        let mut config = ServiceConfig::default();
        config.breaker.failure_threshold = 0;
        assert!(validate_config(&config).is_ok());
    }
}
