//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned and propagated)
//!     → [auth middleware, when configured]
//!     → api handlers (resolver / publisher)
//!     → JSON response
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
