//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the snapshot store (optionally seeded from disk)
//! - Open the delivery channel and spawn the merge pipeline
//! - Spawn the request statistics window reset
//! - Assemble the state shared by HTTP handlers

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ApiConfig;
use crate::http::AppState;
use crate::lifecycle::Shutdown;
use crate::observability::stats::{RequestStatistics, STATS_WINDOW};
use crate::pipeline::{load_seed, SeedError, SnapshotMerger};
use crate::publisher::{PublisherSettings, UpdatePublisher};
use crate::store::SnapshotStore;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load seed snapshot: {0}")]
    Seed(#[from] SeedError),

    #[error("failed to load TLS material: {0}")]
    Tls(std::io::Error),

    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),
}

/// Running core services.
pub struct Services {
    pub state: AppState,
    /// The merge pipeline task; finishes after shutdown.
    pub merger: JoinHandle<()>,
    /// Resets the recent request counters; finishes after shutdown.
    pub stats_window: JoinHandle<()>,
}

/// Create the store, spawn the merge pipeline and build the handler state.
///
/// Must be called from within a Tokio runtime.
pub fn start_services(config: &ApiConfig, shutdown: &Shutdown) -> Result<Services, StartupError> {
    let store = match &config.pipeline.seed_file {
        Some(path) => Arc::new(SnapshotStore::with_snapshot(load_seed(Path::new(path))?)),
        None => Arc::new(SnapshotStore::new()),
    };

    let (sender, updates) = mpsc::channel(config.pipeline.channel_capacity);
    let merger = SnapshotMerger::new(store.clone());
    let merger = tokio::spawn(merger.run(updates, shutdown.subscribe()));

    let stats = Arc::new(RequestStatistics::new());
    let stats_window = tokio::spawn(stats.clone().run_window(STATS_WINDOW, shutdown.subscribe()));

    let publisher = UpdatePublisher::new(
        sender,
        PublisherSettings {
            provider_name: config.api.provider_name.clone(),
            read_only: config.api.read_only,
            submit_timeout: Duration::from_millis(config.api.submit_timeout_ms),
        },
    );

    tracing::info!(
        provider = %config.api.provider_name,
        read_only = config.api.read_only,
        channel_capacity = config.pipeline.channel_capacity,
        "Core services started"
    );

    Ok(Services {
        state: AppState {
            store,
            publisher,
            stats,
            max_body_bytes: config.api.max_body_bytes,
        },
        merger,
        stats_window,
    })
}
