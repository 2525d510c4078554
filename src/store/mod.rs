//! Snapshot storage subsystem.
//!
//! # Data Flow
//! ```text
//! merge pipeline builds Snapshot
//!     → SnapshotStore::set (atomic pointer swap)
//!     → readers call SnapshotStore::get once per request
//!     → each reader keeps its Arc<Snapshot> until done
//! ```
//!
//! # Design Decisions
//! - Whole-snapshot replacement only; nothing inside a snapshot is mutated
//! - Reads and writes never block each other (arc-swap)
//! - Old snapshots stay alive for as long as a reader holds them

pub mod snapshot_store;

pub use snapshot_store::{Installed, SnapshotStore};
