//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, capacity > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ApiConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ApiConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check an `ApiConfig` for semantic errors.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() {
            errors.push(ValidationError::Empty("listener.tls.cert_path"));
        }
        if tls.key_path.is_empty() {
            errors.push(ValidationError::Empty("listener.tls.key_path"));
        }
    }

    if config.api.provider_name.is_empty() {
        errors.push(ValidationError::Empty("api.provider_name"));
    }
    if config.api.submit_timeout_ms == 0 {
        errors.push(ValidationError::Zero("api.submit_timeout_ms"));
    }
    if config.api.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("api.max_body_bytes"));
    }
    if config.pipeline.channel_capacity == 0 {
        errors.push(ValidationError::Zero("pipeline.channel_capacity"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if let Some(auth) = &config.auth {
        if auth.api_key.is_empty() {
            errors.push(ValidationError::Empty("auth.api_key"));
        }
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
