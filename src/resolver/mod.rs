//! Hierarchical query resolution.
//!
//! # Data Flow
//! ```text
//! URL segments
//!     → path.rs (QueryPath: closed set of addressable levels)
//!     → lookup.rs (walk one Snapshot: provider → backend → server
//!                                    provider → frontend → route)
//!     → Resolved (borrowed, serializes as the narrowest entity)
//! ```
//!
//! # Design Decisions
//! - The snapshot is fetched once by the caller and passed in; resolution
//!   never re-reads the store, so all levels come from the same snapshot
//! - First missing key ends the walk; no partial results
//! - Callers get one NotFound regardless of which level was missing

pub mod lookup;
pub mod path;

pub use lookup::{resolve, Resolved};
pub use path::{QueryPath, ResolveError};
