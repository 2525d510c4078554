//! Configuration entity definitions.
//!
//! Field names follow the camelCase JSON used by routing providers. Anything
//! this service does not name explicitly lands in `extra` and is passed
//! through as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Opaque attribute bag carried by every entity.
pub type Attributes = Map<String, Value>;

/// Configuration published by a single provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Configuration {
    /// Backend ID -> Backend.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub backends: BTreeMap<String, Backend>,

    /// Frontend ID -> Frontend.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub frontends: BTreeMap<String, Frontend>,

    #[serde(flatten)]
    pub extra: Attributes,
}

impl Configuration {
    /// True when the configuration holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty() && self.frontends.is_empty() && self.extra.is_empty()
    }
}

/// A named pool of servers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Backend {
    /// Server ID -> Server.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub servers: BTreeMap<String, Server>,

    /// Load balancing metadata (method, stickiness, circuit breaker, ...).
    #[serde(flatten)]
    pub extra: Attributes,
}

/// One member of a backend pool.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Server {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,

    pub weight: i64,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// A named routing entry point.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Frontend {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,

    /// Backend ID this frontend forwards to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backend: String,

    /// Route ID -> Route.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub routes: BTreeMap<String, Route>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pass_host_header: bool,

    pub priority: i64,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// A single matching rule of a frontend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Route {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule: String,

    #[serde(flatten)]
    pub extra: Attributes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_is_valid() {
        let config: Configuration = serde_json::from_str("{}").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_camel_case_fields() {
        let config: Configuration = serde_json::from_value(json!({
            "frontends": {
                "f1": {
                    "entryPoints": ["http"],
                    "backend": "b1",
                    "passHostHeader": true,
                    "priority": 10,
                    "routes": { "r1": { "rule": "Host:example.com" } }
                }
            }
        }))
        .unwrap();

        let frontend = &config.frontends["f1"];
        assert_eq!(frontend.entry_points, vec!["http".to_string()]);
        assert!(frontend.pass_host_header);
        assert_eq!(frontend.priority, 10);
        assert_eq!(frontend.routes["r1"].rule, "Host:example.com");
        assert!(frontend.extra.is_empty());
    }

    #[test]
    fn test_opaque_metadata_is_preserved() {
        let input = json!({
            "backends": {
                "b1": {
                    "loadBalancer": { "method": "drr" },
                    "servers": { "s1": { "url": "http://10.0.0.1:80", "weight": 2, "tags": ["a"] } }
                }
            }
        });
        let config: Configuration = serde_json::from_value(input.clone()).unwrap();
        let backend = &config.backends["b1"];
        assert_eq!(backend.extra["loadBalancer"], json!({ "method": "drr" }));
        assert_eq!(backend.servers["s1"].extra["tags"], json!(["a"]));

        assert_eq!(serde_json::to_value(&config).unwrap(), input);
    }

    #[test]
    fn test_top_level_metadata_is_preserved() {
        let input = json!({
            "backends": {},
            "tls": [{ "entryPoints": ["https"] }],
            "version": 7
        });
        let config: Configuration = serde_json::from_value(input).unwrap();
        assert!(config.backends.is_empty());
        assert_eq!(config.extra["version"], json!(7));
        assert!(!config.is_empty());

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({ "tls": [{ "entryPoints": ["https"] }], "version": 7 })
        );
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let err = serde_json::from_str::<Configuration>(r#"{"backends": []}"#).unwrap_err();
        assert!(err.to_string().contains("invalid type"));
    }
}
