//! Build identifiers.

use serde::Serialize;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Release codename.
pub const CODENAME: &str = "camembert";

/// Body of `/api/version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    #[serde(rename = "Version")]
    pub version: &'static str,
    #[serde(rename = "Codename")]
    pub codename: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            codename: CODENAME,
        }
    }
}
