//! Update publisher for externally submitted configuration.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::SendTimeoutError};

use crate::model::{ConfigMessage, Configuration, RESERVED_PROVIDER};
use crate::observability::metrics;

/// Reasons a submission is refused.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The API runs in read-only mode.
    #[error("REST API is in read-only mode")]
    ReadOnly,

    /// Only the reserved provider accepts updates.
    #[error("Only '{reserved}' provider can be updated through the REST API")]
    InvalidProvider { reserved: String, requested: String },

    /// The body is not a configuration document.
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),

    /// The request body could not be read within the size limit.
    #[error("request body too large or unreadable")]
    Body(String),

    /// The merge pipeline did not accept the message in time.
    #[error("configuration pipeline busy, update not accepted within {0:?}")]
    Timeout(Duration),

    /// The merge pipeline has stopped.
    #[error("configuration pipeline is not running")]
    PipelineClosed,
}

impl SubmitError {
    fn outcome(&self) -> &'static str {
        match self {
            SubmitError::ReadOnly => "read_only",
            SubmitError::InvalidProvider { .. } => "invalid_provider",
            SubmitError::Malformed(_) => "malformed",
            SubmitError::Body(_) => "body",
            SubmitError::Timeout(_) => "timeout",
            SubmitError::PipelineClosed => "closed",
        }
    }
}

/// Publisher settings, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct PublisherSettings {
    /// The only provider name the write path accepts.
    pub provider_name: String,
    pub read_only: bool,
    /// Upper bound on the wait for channel capacity.
    pub submit_timeout: Duration,
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            provider_name: RESERVED_PROVIDER.to_string(),
            read_only: false,
            submit_timeout: Duration::from_secs(5),
        }
    }
}

/// Hands configurations for the reserved provider to the merge pipeline.
#[derive(Debug, Clone)]
pub struct UpdatePublisher {
    sender: mpsc::Sender<ConfigMessage>,
    settings: PublisherSettings,
}

impl UpdatePublisher {
    pub fn new(sender: mpsc::Sender<ConfigMessage>, settings: PublisherSettings) -> Self {
        Self { sender, settings }
    }

    /// The reserved provider name.
    pub fn provider_name(&self) -> &str {
        &self.settings.provider_name
    }

    pub fn is_read_only(&self) -> bool {
        self.settings.read_only
    }

    /// Check that a write for `provider` is allowed at all.
    pub fn authorize(&self, provider: &str) -> Result<(), SubmitError> {
        if self.settings.read_only {
            return Err(SubmitError::ReadOnly);
        }
        if provider != self.settings.provider_name {
            return Err(SubmitError::InvalidProvider {
                reserved: self.settings.provider_name.clone(),
                requested: provider.to_string(),
            });
        }
        Ok(())
    }

    /// Like `authorize`, but a refusal is logged and counted.
    pub fn admit(&self, provider: &str) -> Result<(), SubmitError> {
        self.authorize(provider).map_err(|e| self.reject(provider, e))
    }

    /// Record a submission that failed before reaching `submit`.
    pub fn reject(&self, provider: &str, error: SubmitError) -> SubmitError {
        self.record_failure(provider, &error);
        error
    }

    /// Parse `body` and enqueue it for `provider`.
    pub async fn submit(&self, provider: &str, body: &[u8]) -> Result<(), SubmitError> {
        let result = self.try_submit(provider, body).await;
        self.record(provider, &result);
        result
    }

    /// Enqueue an already parsed configuration for `provider`.
    pub async fn submit_configuration(
        &self,
        provider: &str,
        configuration: Configuration,
    ) -> Result<(), SubmitError> {
        let result = match self.authorize(provider) {
            Ok(()) => self.enqueue(configuration).await,
            Err(e) => Err(e),
        };
        self.record(provider, &result);
        result
    }

    async fn try_submit(&self, provider: &str, body: &[u8]) -> Result<(), SubmitError> {
        self.authorize(provider)?;
        let configuration: Configuration = serde_json::from_slice(body)?;
        self.enqueue(configuration).await
    }

    async fn enqueue(&self, configuration: Configuration) -> Result<(), SubmitError> {
        let message = ConfigMessage::new(self.settings.provider_name.clone(), configuration);
        match self
            .sender
            .send_timeout(message, self.settings.submit_timeout)
            .await
        {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => {
                Err(SubmitError::Timeout(self.settings.submit_timeout))
            }
            Err(SendTimeoutError::Closed(_)) => Err(SubmitError::PipelineClosed),
        }
    }

    fn record(&self, provider: &str, result: &Result<(), SubmitError>) {
        match result {
            Ok(()) => {
                tracing::info!(provider = %provider, "Configuration update enqueued");
                metrics::record_submission("accepted");
            }
            Err(e) => self.record_failure(provider, e),
        }
    }

    fn record_failure(&self, provider: &str, e: &SubmitError) {
        match e {
            SubmitError::Malformed(_) => {
                tracing::error!(provider = %provider, error = %e, "Error parsing configuration")
            }
            SubmitError::Body(reason) => {
                tracing::warn!(provider = %provider, error = %reason, "Failed to read request body")
            }
            SubmitError::Timeout(_) | SubmitError::PipelineClosed => {
                tracing::error!(provider = %provider, error = %e, "Configuration update not delivered")
            }
            _ => tracing::warn!(provider = %provider, error = %e, "Configuration update rejected"),
        }
        metrics::record_submission(e.outcome());
    }
}
