//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::model::RESERVED_PROVIDER;

/// Root configuration for the snapshot API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// REST API behaviour (write path, debug endpoints).
    pub api: RestConfig,

    /// Merge pipeline settings.
    pub pipeline: PipelineConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Optional authentication for every route.
    pub auth: Option<AuthConfig>,

    /// Dashboard asset serving.
    pub dashboard: DashboardConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RestConfig {
    /// The only provider the PUT endpoint accepts.
    pub provider_name: String,

    /// Reject every write.
    pub read_only: bool,

    /// Expose `/debug/vars`.
    pub debug: bool,

    /// Maximum wait for the merge pipeline to accept an update, in milliseconds.
    pub submit_timeout_ms: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            provider_name: RESERVED_PROVIDER.to_string(),
            read_only: false,
            debug: false,
            submit_timeout_ms: 5000,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Merge pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Capacity of the delivery channel (backpressure).
    pub channel_capacity: usize,

    /// JSON file with the initial snapshot (provider → configuration).
    pub seed_file: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            seed_file: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Bearer token authentication.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Token expected in `Authorization: Bearer <api_key>`.
    pub api_key: String,
}

/// Dashboard configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory served under `/dashboard/`.
    pub assets_dir: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
