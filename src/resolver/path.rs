//! Addressable levels of the configuration graph.

use thiserror::Error;
use url::Url;

/// Resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A provider, backend, server, frontend or route does not exist.
    #[error("not found")]
    NotFound,

    /// The segments do not describe any level of the graph.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),
}

/// One addressable entity or collection in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPath {
    Root,
    Provider { provider: String },
    Backends { provider: String },
    Backend { provider: String, backend: String },
    Servers { provider: String, backend: String },
    Server { provider: String, backend: String, server: String },
    Frontends { provider: String },
    Frontend { provider: String, frontend: String },
    Routes { provider: String, frontend: String },
    Route { provider: String, frontend: String, route: String },
}

impl QueryPath {
    /// Build a path from segments below `/api/providers`.
    ///
    /// `["docker", "backends", "b1"]` is the backend `b1` of provider `docker`.
    pub fn parse<S: AsRef<str>>(segments: &[S]) -> Result<Self, ResolveError> {
        let segs: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
        if segs.iter().any(|s| s.is_empty()) {
            return Err(ResolveError::InvalidPath(segs.join("/")));
        }

        let path = match segs.as_slice() {
            [] => QueryPath::Root,
            [p] => QueryPath::Provider { provider: p.to_string() },
            [p, "backends"] => QueryPath::Backends { provider: p.to_string() },
            [p, "backends", b] => QueryPath::Backend {
                provider: p.to_string(),
                backend: b.to_string(),
            },
            [p, "backends", b, "servers"] => QueryPath::Servers {
                provider: p.to_string(),
                backend: b.to_string(),
            },
            [p, "backends", b, "servers", s] => QueryPath::Server {
                provider: p.to_string(),
                backend: b.to_string(),
                server: s.to_string(),
            },
            [p, "frontends"] => QueryPath::Frontends { provider: p.to_string() },
            [p, "frontends", f] => QueryPath::Frontend {
                provider: p.to_string(),
                frontend: f.to_string(),
            },
            [p, "frontends", f, "routes"] => QueryPath::Routes {
                provider: p.to_string(),
                frontend: f.to_string(),
            },
            [p, "frontends", f, "routes", r] => QueryPath::Route {
                provider: p.to_string(),
                frontend: f.to_string(),
                route: r.to_string(),
            },
            other => return Err(ResolveError::InvalidPath(other.join("/"))),
        };
        Ok(path)
    }

    /// Parse a slash separated path such as `docker/backends/b1`.
    pub fn parse_str(path: &str) -> Result<Self, ResolveError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(QueryPath::Root);
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        Self::parse(&segments)
    }

    /// Segments below `/api/providers`, the inverse of `parse`.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            QueryPath::Root => vec![],
            QueryPath::Provider { provider } => vec![provider],
            QueryPath::Backends { provider } => vec![provider, "backends"],
            QueryPath::Backend { provider, backend } => vec![provider, "backends", backend],
            QueryPath::Servers { provider, backend } => {
                vec![provider, "backends", backend, "servers"]
            }
            QueryPath::Server { provider, backend, server } => {
                vec![provider, "backends", backend, "servers", server]
            }
            QueryPath::Frontends { provider } => vec![provider, "frontends"],
            QueryPath::Frontend { provider, frontend } => vec![provider, "frontends", frontend],
            QueryPath::Routes { provider, frontend } => {
                vec![provider, "frontends", frontend, "routes"]
            }
            QueryPath::Route { provider, frontend, route } => {
                vec![provider, "frontends", frontend, "routes", route]
            }
        }
    }

    /// API URL for this level below `base`, each identifier percent-encoded.
    ///
    /// `None` when `base` cannot carry a path, such as a `mailto:` URL.
    pub fn to_url(&self, base: &Url) -> Option<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["api", "providers"])
            .extend(self.segments());
        Some(url)
    }

    /// Provider addressed by this path, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            QueryPath::Root => None,
            QueryPath::Provider { provider }
            | QueryPath::Backends { provider }
            | QueryPath::Backend { provider, .. }
            | QueryPath::Servers { provider, .. }
            | QueryPath::Server { provider, .. }
            | QueryPath::Frontends { provider }
            | QueryPath::Frontend { provider, .. }
            | QueryPath::Routes { provider, .. }
            | QueryPath::Route { provider, .. } => Some(provider),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(QueryPath::parse::<&str>(&[]).unwrap(), QueryPath::Root);
        assert_eq!(
            QueryPath::parse(&["docker", "backends", "b1", "servers", "s1"]).unwrap(),
            QueryPath::Server {
                provider: "docker".into(),
                backend: "b1".into(),
                server: "s1".into(),
            }
        );
        assert_eq!(
            QueryPath::parse(&["docker", "frontends", "f1", "routes"]).unwrap(),
            QueryPath::Routes {
                provider: "docker".into(),
                frontend: "f1".into(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_shapes() {
        assert!(matches!(
            QueryPath::parse(&["docker", "widgets"]),
            Err(ResolveError::InvalidPath(_))
        ));
        assert!(matches!(
            QueryPath::parse(&["docker", "backends", "b1", "routes"]),
            Err(ResolveError::InvalidPath(_))
        ));
        assert!(matches!(
            QueryPath::parse(&["a", "backends", "b", "servers", "s", "extra"]),
            Err(ResolveError::InvalidPath(_))
        ));
        assert!(matches!(
            QueryPath::parse(&["docker", ""]),
            Err(ResolveError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_parse_str_and_url() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let path = QueryPath::parse_str("/docker/frontends/f1/routes/r1").unwrap();
        assert_eq!(
            path.to_url(&base).unwrap().as_str(),
            "http://localhost:8080/api/providers/docker/frontends/f1/routes/r1"
        );
        assert_eq!(path.provider(), Some("docker"));

        assert_eq!(QueryPath::parse_str("").unwrap(), QueryPath::Root);
        assert_eq!(
            QueryPath::Root.to_url(&base).unwrap().as_str(),
            "http://localhost:8080/api/providers"
        );
    }

    #[test]
    fn test_url_encodes_identifiers() {
        let base = Url::parse("http://localhost:8080/").unwrap();
        let path = QueryPath::Server {
            provider: "file".into(),
            backend: "b?1#x".into(),
            server: "50%".into(),
        };
        let url = path.to_url(&base).unwrap();
        assert_eq!(url.path(), "/api/providers/file/backends/b%3F1%23x/servers/50%25");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let decoded: Vec<String> = url
            .path_segments()
            .unwrap()
            .skip(2)
            .map(|s| s.replace("%3F", "?").replace("%23", "#").replace("%25", "%"))
            .collect();
        assert_eq!(QueryPath::parse(&decoded).unwrap(), path);
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let base = Url::parse("https://proxy.example/admin/").unwrap();
        let url = QueryPath::Backends { provider: "web".into() }.to_url(&base).unwrap();
        assert_eq!(url.as_str(), "https://proxy.example/admin/api/providers/web/backends");
    }

    #[test]
    fn test_keyword_as_identifier() {
        // A backend may itself be called "servers".
        let path = QueryPath::parse(&["p", "backends", "servers"]).unwrap();
        assert_eq!(
            path,
            QueryPath::Backend {
                provider: "p".into(),
                backend: "servers".into(),
            }
        );
    }
}
