//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by method, status
//! - `api_request_duration_seconds` (histogram): latency distribution
//! - `config_submissions_total` (counter): write path outcomes
//! - `snapshot_installs_total` (counter): snapshots installed by the merger
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("api_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_submission(outcome: &'static str) {
    metrics::counter!("config_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_snapshot_install() {
    metrics::counter!("snapshot_installs_total").increment(1);
}
