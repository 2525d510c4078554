//! Snapshot of every provider's configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::types::Configuration;

/// Provider name accepted by the write path unless overridden in the service config.
pub const RESERVED_PROVIDER: &str = "web";

/// The complete configuration graph across all providers.
///
/// A snapshot is immutable once built. Successive snapshots may share
/// `Arc<Configuration>` values for providers that did not change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    providers: BTreeMap<String, Arc<Configuration>>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up one provider's configuration.
    pub fn provider(&self, name: &str) -> Option<&Arc<Configuration>> {
        self.providers.get(name)
    }

    /// Iterate providers in name order.
    pub fn providers(&self) -> impl Iterator<Item = (&String, &Arc<Configuration>)> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl From<BTreeMap<String, Arc<Configuration>>> for Snapshot {
    fn from(providers: BTreeMap<String, Arc<Configuration>>) -> Self {
        Self { providers }
    }
}

impl FromIterator<(String, Configuration)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Configuration)>>(iter: I) -> Self {
        Self {
            providers: iter
                .into_iter()
                .map(|(name, config)| (name, Arc::new(config)))
                .collect(),
        }
    }
}

/// A configuration handed to the merge pipeline on behalf of one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMessage {
    pub provider_name: String,
    pub configuration: Configuration,
}

impl ConfigMessage {
    pub fn new(provider_name: impl Into<String>, configuration: Configuration) -> Self {
        Self {
            provider_name: provider_name.into(),
            configuration,
        }
    }
}
