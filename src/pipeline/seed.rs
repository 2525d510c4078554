//! Initial snapshot loading.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::Snapshot;

/// Error type for seed loading.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a JSON object of provider name → configuration.
pub fn load_seed(path: &Path) -> Result<Snapshot, SeedError> {
    let content = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;
    tracing::info!(path = ?path, providers = snapshot.len(), "Loaded seed snapshot");
    Ok(snapshot)
}
