use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::http::server::AppState;
use crate::model::Configuration;
use crate::observability::runtime::runtime_vars;
use crate::observability::stats::{StatsData, StatsSource};
use crate::publisher::SubmitError;
use crate::resolver::{resolve, QueryPath};
use crate::version::VersionInfo;

/// Resolve `path` against one snapshot read and render it as JSON.
fn render(state: &AppState, path: QueryPath) -> Result<Response, ApiError> {
    let snapshot = state.store.get();
    let resolved = resolve(&snapshot, &path)?;
    Ok(Json(resolved).into_response())
}

pub async fn get_health(State(state): State<AppState>) -> Json<StatsData> {
    Json(state.stats.data())
}

pub async fn get_ping() -> &'static str {
    "OK"
}

pub async fn get_version() -> Json<VersionInfo> {
    Json(VersionInfo::current())
}

pub async fn get_providers(State(state): State<AppState>) -> Result<Response, ApiError> {
    render(&state, QueryPath::Root)
}

pub async fn get_provider(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Provider { provider })
}

/// Submit a configuration for the reserved provider.
///
/// The response is the provider's configuration as currently installed,
/// which may not include this update yet.
pub async fn put_provider(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    body: Body,
) -> Result<Json<Arc<Configuration>>, ApiError> {
    // Refuse before reading the body.
    state.publisher.admit(&provider)?;

    let body = to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| state.publisher.reject(&provider, SubmitError::Body(e.to_string())))?;
    state.publisher.submit(&provider, &body).await?;

    let current = state
        .store
        .get()
        .provider(state.publisher.provider_name())
        .cloned()
        .unwrap_or_default();
    Ok(Json(current))
}

pub async fn get_backends(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Backends { provider })
}

pub async fn get_backend(
    State(state): State<AppState>,
    Path((provider, backend)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Backend { provider, backend })
}

pub async fn get_servers(
    State(state): State<AppState>,
    Path((provider, backend)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Servers { provider, backend })
}

pub async fn get_server(
    State(state): State<AppState>,
    Path((provider, backend, server)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Server { provider, backend, server })
}

pub async fn get_frontends(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Frontends { provider })
}

pub async fn get_frontend(
    State(state): State<AppState>,
    Path((provider, frontend)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Frontend { provider, frontend })
}

pub async fn get_routes(
    State(state): State<AppState>,
    Path((provider, frontend)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Routes { provider, frontend })
}

pub async fn get_route(
    State(state): State<AppState>,
    Path((provider, frontend, route)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    render(&state, QueryPath::Route { provider, frontend, route })
}

pub async fn get_debug_vars(State(state): State<AppState>) -> Json<Map<String, Value>> {
    Json(runtime_vars(&state.store, state.stats.as_ref()))
}

pub async fn redirect_dashboard() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/dashboard/")])
}
