//! Lock-free holder of the current snapshot.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::model::Snapshot;

/// A snapshot together with the install counter it was published under.
#[derive(Debug)]
pub struct Installed {
    /// Number of `set` calls that preceded this snapshot (0 = initial).
    pub generation: u64,
    pub snapshot: Arc<Snapshot>,
}

/// Process-wide holder of the current configuration snapshot.
///
/// Shared as `Arc<SnapshotStore>`; `get` and `set` may be called from any
/// number of tasks concurrently.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Installed>,
}

impl SnapshotStore {
    /// Create a store holding an empty snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::new())
    }

    /// Create a store with an initial snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(Installed {
                generation: 0,
                snapshot: Arc::new(snapshot),
            }),
        }
    }

    /// Return the snapshot current at the moment of the call.
    pub fn get(&self) -> Arc<Snapshot> {
        self.current.load().snapshot.clone()
    }

    /// Return the current snapshot and its generation as one consistent pair.
    pub fn load(&self) -> Arc<Installed> {
        self.current.load_full()
    }

    /// Generation of the current snapshot.
    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Atomically install `snapshot` as current and return its generation.
    pub fn set(&self, snapshot: Snapshot) -> u64 {
        let snapshot = Arc::new(snapshot);
        let previous = self.current.rcu(|old| Installed {
            generation: old.generation + 1,
            snapshot: snapshot.clone(),
        });
        let generation = previous.generation + 1;
        tracing::debug!(generation, providers = snapshot.len(), "Snapshot installed");
        generation
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
