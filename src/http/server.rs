//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all API handlers
//! - Wire up middleware (request ID, tracing, statistics, timeouts, limits, auth)
//! - Bind server to a plain or TLS listener
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api::{self, auth::bearer_auth_middleware};
use crate::config::ApiConfig;
use crate::http::request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
use crate::observability::stats::{record_stats_middleware, StatsSource};
use crate::publisher::UpdatePublisher;
use crate::store::SnapshotStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub publisher: UpdatePublisher,
    pub stats: Arc<dyn StatsSource>,
    /// Upper bound for PUT bodies.
    pub max_body_bytes: usize,
}

/// HTTP server for the snapshot API.
pub struct HttpServer {
    router: Router,
    config: ApiConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ApiConfig, state: AppState) -> Router {
        let stats = state.stats.clone();
        let mut router = api::setup_api_router(state, config);

        if let Some(auth) = &config.auth {
            router = router.layer(middleware::from_fn_with_state(
                Arc::new(auth.clone()),
                bearer_auth_middleware,
            ));
        }

        router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.api.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(stats, record_stats_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            read_only = self.config.api.read_only,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %addr,
            read_only = self.config.api.read_only,
            "HTTPS server starting"
        );

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTPS server received shutdown signal");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
