//! Write path for the reserved provider.
//!
//! # Data Flow
//! ```text
//! PUT body
//!     → UpdatePublisher::submit (read-only, identity, parse checks)
//!     → bounded mpsc channel (ordered, backpressured)
//!     → merge pipeline
//!     → (later) SnapshotStore::set
//! ```
//!
//! # Consistency
//! A successful submit only means the message was enqueued. The store is not
//! touched here, so a read issued right after a submit may still return the
//! previous configuration until the pipeline installs a new snapshot.

pub mod update;

pub use update::{PublisherSettings, SubmitError, UpdatePublisher};
