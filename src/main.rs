//! Configuration snapshot API.
//!
//! Serves the merged routing configuration of every provider over a
//! read-only REST API and accepts configuration updates for one reserved
//! provider.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                  SNAPSHOT API                    │
//!                  │                                                  │
//!   GET /api/...   │  ┌──────────┐    ┌──────────┐    ┌───────────┐   │
//!  ────────────────┼─▶│   http   │───▶│ resolver │───▶│   store   │   │
//!                  │  │  server  │    └──────────┘    │ (ArcSwap) │   │
//!                  │  └────┬─────┘                    └─────▲─────┘   │
//!   PUT /api/...   │       │                                │ set     │
//!  ────────────────┼───────┘   ┌───────────┐   mpsc   ┌─────┴─────┐   │
//!                  │      ────▶│ publisher │─────────▶│  merger   │   │
//!                  │           └───────────┘          └───────────┘   │
//!                  └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use snapshot_api::config::{load_config, ApiConfig};
use snapshot_api::lifecycle::{start_services, Shutdown, StartupError};
use snapshot_api::net::tls::load_tls_config;
use snapshot_api::observability::{logging, metrics};
use snapshot_api::version::{CODENAME, VERSION};
use snapshot_api::HttpServer;

#[derive(Parser)]
#[command(name = "snapshot-api")]
#[command(about = "REST API over the current routing configuration snapshot", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Reject every write.
    #[arg(long)]
    read_only: bool,

    /// Expose /debug/vars.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ApiConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    config.api.read_only |= args.read_only;
    config.api.debug |= args.debug;
    if let Err(errors) = snapshot_api::config::validation::validate_config(&config) {
        return Err(snapshot_api::config::ConfigError::Validation(errors).into());
    }

    logging::init(&config.observability.log_level);
    tracing::info!(version = VERSION, codename = CODENAME, "snapshot-api starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let services = start_services(&config, &shutdown)?;
    let server = HttpServer::new(config.clone(), services.state);

    match &config.listener.tls {
        Some(tls) => {
            let addr: SocketAddr = config.listener.bind_address.parse()?;
            let rustls = load_tls_config(tls).await.map_err(StartupError::Tls)?;
            server.run_tls(addr, rustls, shutdown.subscribe()).await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(&config.listener.bind_address)
                .await
                .map_err(StartupError::Bind)?;
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    shutdown.trigger();
    if let Err(e) = services.merger.await {
        tracing::error!(error = %e, "Configuration merger task failed");
    }
    if let Err(e) = services.stats_window.await {
        tracing::error!(error = %e, "Statistics window task failed");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
