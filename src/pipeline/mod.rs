//! Default merge pipeline.
//!
//! # Data Flow
//! ```text
//! seed file (JSON, provider → Configuration)
//!     → seed.rs (initial Snapshot)
//!
//! mpsc::Receiver<ConfigMessage>
//!     → merger.rs (latest configuration per provider)
//!     → build a brand-new Snapshot
//!     → SnapshotStore::set
//! ```
//!
//! # Design Decisions
//! - Messages are applied strictly in channel order; last applied wins
//! - Unchanged configurations do not produce a new snapshot
//! - Unchanged providers are shared between snapshots via Arc

pub mod merger;
pub mod seed;

pub use merger::SnapshotMerger;
pub use seed::{load_seed, SeedError};
