//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (Prometheus counters and histograms)
//!
//! The HTTP surface additionally feeds:
//!     → stats.rs (aggregate request statistics for /health)
//!     → runtime.rs (process counters for /debug/vars)
//! ```
//!
//! # Design Decisions
//! - Structured logging with tracing fields for machine parsing
//! - Request ID flows through every request span
//! - Metrics are cheap (atomic increments); exporter is opt-in

pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod stats;

pub use stats::{RequestStatistics, StatsSource};
