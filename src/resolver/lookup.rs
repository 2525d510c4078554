//! Path walking over a single snapshot.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Backend, Configuration, Frontend, Route, Server, Snapshot};
use crate::resolver::path::{QueryPath, ResolveError};

/// The entity or collection a query resolved to.
///
/// Borrows from the snapshot it was resolved against and serializes as the
/// bare entity, without a tag.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Resolved<'a> {
    Snapshot(&'a Snapshot),
    Configuration(&'a Configuration),
    Backends(&'a BTreeMap<String, Backend>),
    Backend(&'a Backend),
    Servers(&'a BTreeMap<String, Server>),
    Server(&'a Server),
    Frontends(&'a BTreeMap<String, Frontend>),
    Frontend(&'a Frontend),
    Routes(&'a BTreeMap<String, Route>),
    Route(&'a Route),
}

/// Resolve `path` against `snapshot`.
///
/// Returns `ResolveError::NotFound` at the first missing key.
pub fn resolve<'a>(snapshot: &'a Snapshot, path: &QueryPath) -> Result<Resolved<'a>, ResolveError> {
    let resolved = match path {
        QueryPath::Root => Resolved::Snapshot(snapshot),
        QueryPath::Provider { provider } => Resolved::Configuration(configuration(snapshot, provider)?),
        QueryPath::Backends { provider } => {
            Resolved::Backends(&configuration(snapshot, provider)?.backends)
        }
        QueryPath::Backend { provider, backend } => {
            Resolved::Backend(find_backend(snapshot, provider, backend)?)
        }
        QueryPath::Servers { provider, backend } => {
            Resolved::Servers(&find_backend(snapshot, provider, backend)?.servers)
        }
        QueryPath::Server { provider, backend, server } => Resolved::Server(lookup(
            &find_backend(snapshot, provider, backend)?.servers,
            server,
        )?),
        QueryPath::Frontends { provider } => {
            Resolved::Frontends(&configuration(snapshot, provider)?.frontends)
        }
        QueryPath::Frontend { provider, frontend } => {
            Resolved::Frontend(find_frontend(snapshot, provider, frontend)?)
        }
        QueryPath::Routes { provider, frontend } => {
            Resolved::Routes(&find_frontend(snapshot, provider, frontend)?.routes)
        }
        QueryPath::Route { provider, frontend, route } => Resolved::Route(lookup(
            &find_frontend(snapshot, provider, frontend)?.routes,
            route,
        )?),
    };
    Ok(resolved)
}

fn lookup<'a, T>(map: &'a BTreeMap<String, T>, key: &str) -> Result<&'a T, ResolveError> {
    map.get(key).ok_or(ResolveError::NotFound)
}

fn configuration<'a>(snapshot: &'a Snapshot, provider: &str) -> Result<&'a Configuration, ResolveError> {
    snapshot
        .provider(provider)
        .map(|config| &**config)
        .ok_or(ResolveError::NotFound)
}

fn find_backend<'a>(
    snapshot: &'a Snapshot,
    provider: &str,
    backend: &str,
) -> Result<&'a Backend, ResolveError> {
    lookup(&configuration(snapshot, provider)?.backends, backend)
}

fn find_frontend<'a>(
    snapshot: &'a Snapshot,
    provider: &str,
    frontend: &str,
) -> Result<&'a Frontend, ResolveError> {
    lookup(&configuration(snapshot, provider)?.frontends, frontend)
}
