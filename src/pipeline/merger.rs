//! Merges provider messages into snapshots.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use crate::model::{ConfigMessage, Configuration, Snapshot};
use crate::observability::metrics;
use crate::store::SnapshotStore;

/// Consumes configuration messages and installs merged snapshots.
pub struct SnapshotMerger {
    store: Arc<SnapshotStore>,
    providers: BTreeMap<String, Arc<Configuration>>,
}

impl SnapshotMerger {
    /// Create a merger that starts from whatever the store currently holds.
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        let providers = store
            .get()
            .providers()
            .map(|(name, config)| (name.clone(), config.clone()))
            .collect();
        Self { store, providers }
    }

    /// Apply one message. Returns the new generation if a snapshot was installed.
    pub fn apply(&mut self, message: ConfigMessage) -> Option<u64> {
        let ConfigMessage {
            provider_name,
            configuration,
        } = message;

        if self
            .providers
            .get(&provider_name)
            .is_some_and(|current| **current == configuration)
        {
            tracing::debug!(provider = %provider_name, "Skipping same configuration");
            return None;
        }

        self.providers
            .insert(provider_name.clone(), Arc::new(configuration));
        let generation = self.store.set(Snapshot::from(self.providers.clone()));
        metrics::record_snapshot_install();

        tracing::info!(
            provider = %provider_name,
            generation,
            providers = self.providers.len(),
            "Configuration applied"
        );
        Some(generation)
    }

    /// Run until shutdown or until every sender is dropped.
    pub async fn run(
        mut self,
        mut updates: mpsc::Receiver<ConfigMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!("Configuration merger starting");
        loop {
            tokio::select! {
                message = updates.recv() => match message {
                    Some(message) => {
                        self.apply(message);
                    }
                    None => {
                        tracing::info!("Configuration channel closed, merger exiting");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Configuration merger received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Backend, Server};

    fn config_with_server(url: &str) -> Configuration {
        let mut backend = Backend::default();
        backend.servers.insert(
            "s1".into(),
            Server {
                url: url.into(),
                weight: 1,
                ..Server::default()
            },
        );
        let mut config = Configuration::default();
        config.backends.insert("b1".into(), backend);
        config
    }

    #[test]
    fn test_apply_installs_snapshot() {
        let store = Arc::new(SnapshotStore::new());
        let mut merger = SnapshotMerger::new(store.clone());

        let generation = merger.apply(ConfigMessage::new("web", config_with_server("http://a")));

        assert_eq!(generation, Some(1));
        let snapshot = store.get();
        assert_eq!(
            snapshot.provider("web").unwrap().backends["b1"].servers["s1"].url,
            "http://a"
        );
    }

    #[test]
    fn test_same_configuration_is_skipped() {
        let store = Arc::new(SnapshotStore::new());
        let mut merger = SnapshotMerger::new(store.clone());

        merger.apply(ConfigMessage::new("web", config_with_server("http://a")));
        assert_eq!(
            merger.apply(ConfigMessage::new("web", config_with_server("http://a"))),
            None
        );
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn test_unchanged_providers_are_shared() {
        let store = Arc::new(SnapshotStore::new());
        let mut merger = SnapshotMerger::new(store.clone());

        merger.apply(ConfigMessage::new("file", config_with_server("http://f")));
        let before = store.get();
        merger.apply(ConfigMessage::new("web", config_with_server("http://w")));
        let after = store.get();

        assert!(Arc::ptr_eq(
            before.provider("file").unwrap(),
            after.provider("file").unwrap()
        ));
        assert!(before.provider("web").is_none());
    }

    #[test]
    fn test_starts_from_existing_snapshot() {
        let seeded: Snapshot = [("file".to_string(), config_with_server("http://f"))]
            .into_iter()
            .collect();
        let store = Arc::new(SnapshotStore::with_snapshot(seeded));
        let mut merger = SnapshotMerger::new(store.clone());

        merger.apply(ConfigMessage::new("web", Configuration::default()));
        let snapshot = store.get();
        assert!(snapshot.provider("file").is_some());
        assert!(snapshot.provider("web").is_some());
    }

    #[tokio::test]
    async fn test_run_applies_in_order_then_exits() {
        let store = Arc::new(SnapshotStore::new());
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        tx.send(ConfigMessage::new("web", config_with_server("http://1"))).await.unwrap();
        tx.send(ConfigMessage::new("web", config_with_server("http://2"))).await.unwrap();
        drop(tx);

        SnapshotMerger::new(store.clone()).run(rx, shutdown_rx).await;

        assert_eq!(store.generation(), 2);
        assert_eq!(
            store.get().provider("web").unwrap().backends["b1"].servers["s1"].url,
            "http://2"
        );
    }
}
