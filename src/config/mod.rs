//! Service configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ApiConfig (validated, immutable)
//!     → command line overrides in main
//!     → shared by value with the HTTP surface and publisher
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ApiConfig;
pub use schema::{AuthConfig, DashboardConfig, ListenerConfig, RestConfig, TlsConfig};
