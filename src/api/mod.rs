//! REST API route table.
//!
//! # Endpoints
//! - `GET /health`, `GET /ping`, `GET /api/version`
//! - `GET /api`, `GET /api/providers` (whole snapshot)
//! - `GET|PUT /api/providers/{provider}`
//! - `GET /api/providers/{provider}/backends[/{backend}[/servers[/{server}]]]`
//! - `GET /api/providers/{provider}/frontends[/{frontend}[/routes[/{route}]]]`
//! - `GET /debug/vars` (debug mode only)
//! - `GET /` redirects to `/dashboard/`

pub mod auth;
pub mod error;
pub mod handlers;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::config::ApiConfig;
use crate::http::server::AppState;
use self::handlers::*;

pub use error::ApiError;

/// Build the API router for the given state.
pub fn setup_api_router(state: AppState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(get_health))
        .route("/ping", get(get_ping))
        .route("/api", get(get_providers))
        .route("/api/version", get(get_version))
        .route("/api/providers", get(get_providers))
        .route("/api/providers/{provider}", get(get_provider).put(put_provider))
        .route("/api/providers/{provider}/backends", get(get_backends))
        .route("/api/providers/{provider}/backends/{backend}", get(get_backend))
        .route("/api/providers/{provider}/backends/{backend}/servers", get(get_servers))
        .route(
            "/api/providers/{provider}/backends/{backend}/servers/{server}",
            get(get_server),
        )
        .route("/api/providers/{provider}/frontends", get(get_frontends))
        .route("/api/providers/{provider}/frontends/{frontend}", get(get_frontend))
        .route("/api/providers/{provider}/frontends/{frontend}/routes", get(get_routes))
        .route(
            "/api/providers/{provider}/frontends/{frontend}/routes/{route}",
            get(get_route),
        )
        .route("/", get(redirect_dashboard));

    if config.api.debug {
        router = router.route("/debug/vars", get(get_debug_vars));
    }

    if let Some(dir) = &config.dashboard.assets_dir {
        tracing::info!(assets_dir = %dir, "Serving dashboard assets");
        router = router.nest_service("/dashboard", ServeDir::new(dir));
    }

    router.with_state(state)
}
