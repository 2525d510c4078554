//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! TlsConfig (cert + key paths)
//!     → tls.rs (load PEM material, fail fast at startup)
//!     → RustlsConfig handed to HttpServer::run_tls
//! ```

pub mod tls;
