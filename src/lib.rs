//! Configuration snapshot API library.

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod net;
pub mod observability;
pub mod pipeline;
pub mod publisher;
pub mod resolver;
pub mod store;
pub mod version;

pub use config::schema::ApiConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use model::{Configuration, Snapshot};
pub use store::SnapshotStore;
