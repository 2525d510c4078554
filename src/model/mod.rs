//! Configuration document model.
//!
//! # Data Flow
//! ```text
//! JSON document (PUT body / seed file / provider)
//!     → types.rs (Configuration → Backend → Server, Frontend → Route)
//!     → snapshot.rs (provider name → Arc<Configuration>)
//!     → installed into the SnapshotStore as one immutable unit
//! ```
//!
//! # Design Decisions
//! - Entities are plain data, never mutated once attached to a Snapshot
//! - Opaque metadata is kept in a flattened attribute bag and round-trips untouched
//! - Maps are ordered (BTreeMap) so rendered documents are deterministic

pub mod snapshot;
pub mod types;

pub use snapshot::{ConfigMessage, Snapshot, RESERVED_PROVIDER};
pub use types::{Backend, Configuration, Frontend, Route, Server};
