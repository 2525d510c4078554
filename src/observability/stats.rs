//! Aggregate request statistics served by `/health`.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::observability::metrics;

/// Length of the window covered by `status_code_count` and `count`.
pub const STATS_WINDOW: Duration = Duration::from_secs(1);

/// Request statistics collector behind the health endpoint.
///
/// `data` must not change the collected figures.
pub trait StatsSource: Send + Sync {
    /// Record one completed response.
    fn record(&self, status: u16, elapsed: Duration);

    fn data(&self) -> StatsData;

    /// Time since collection started.
    fn uptime(&self) -> Duration;
}

/// Statistics document.
///
/// `status_code_count` and `count` cover the current window; the `total_*`
/// fields cover the whole process lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct StatsData {
    pub pid: u32,
    pub uptime: String,
    pub uptime_sec: f64,
    pub time: String,
    pub unixtime: i64,
    pub status_code_count: BTreeMap<String, u64>,
    pub total_status_code_count: BTreeMap<String, u64>,
    pub count: u64,
    pub total_count: u64,
    pub total_response_time: String,
    pub total_response_time_sec: f64,
    pub average_response_time: String,
    pub average_response_time_sec: f64,
}

#[derive(Default)]
struct Counter {
    recent: AtomicU64,
    total: AtomicU64,
}

/// Collects status codes and latencies of every response.
pub struct RequestStatistics {
    started: Instant,
    status_codes: DashMap<u16, Counter>,
    recent_count: AtomicU64,
    total_count: AtomicU64,
    total_response_nanos: AtomicU64,
}

impl RequestStatistics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            status_codes: DashMap::new(),
            recent_count: AtomicU64::new(0),
            total_count: AtomicU64::new(0),
            total_response_nanos: AtomicU64::new(0),
        }
    }

    /// Start a new window for the recent counters.
    pub fn reset_window(&self) {
        for entry in self.status_codes.iter() {
            entry.value().recent.store(0, Ordering::Relaxed);
        }
        self.recent_count.store(0, Ordering::Relaxed);
    }

    /// Reset the recent counters every `period` until shutdown.
    pub async fn run_window(self: Arc<Self>, period: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.reset_window(),
                _ = shutdown.recv() => {
                    tracing::debug!("Statistics window task stopped");
                    return;
                }
            }
        }
    }
}

impl Default for RequestStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSource for RequestStatistics {
    fn record(&self, status: u16, elapsed: Duration) {
        let counter = self.status_codes.entry(status).or_default();
        counter.recent.fetch_add(1, Ordering::Relaxed);
        counter.total.fetch_add(1, Ordering::Relaxed);
        drop(counter);

        self.recent_count.fetch_add(1, Ordering::Relaxed);
        self.total_count.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.total_response_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    fn data(&self) -> StatsData {
        let mut status_code_count = BTreeMap::new();
        let mut total_status_code_count = BTreeMap::new();
        for entry in self.status_codes.iter() {
            let code = entry.key().to_string();
            let recent = entry.value().recent.load(Ordering::Relaxed);
            if recent > 0 {
                status_code_count.insert(code.clone(), recent);
            }
            total_status_code_count.insert(code, entry.value().total.load(Ordering::Relaxed));
        }

        let uptime = self.uptime();
        let total_count = self.total_count.load(Ordering::Relaxed);
        let total_response = Duration::from_nanos(self.total_response_nanos.load(Ordering::Relaxed));
        let average_response = if total_count > 0 {
            total_response / u32::try_from(total_count).unwrap_or(u32::MAX)
        } else {
            Duration::ZERO
        };
        let now = Utc::now();

        StatsData {
            pid: std::process::id(),
            uptime: format!("{uptime:?}"),
            uptime_sec: uptime.as_secs_f64(),
            time: now.to_rfc3339(),
            unixtime: now.timestamp(),
            status_code_count,
            total_status_code_count,
            count: self.recent_count.load(Ordering::Relaxed),
            total_count,
            total_response_time: format!("{total_response:?}"),
            total_response_time_sec: total_response.as_secs_f64(),
            average_response_time: format!("{average_response:?}"),
            average_response_time_sec: average_response.as_secs_f64(),
        }
    }
}

/// Middleware recording every response into the collector and the metrics registry.
pub async fn record_stats_middleware(
    State(stats): State<Arc<dyn StatsSource>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    stats.record(status, start.elapsed());
    metrics::record_request(&method, status, start);
    response
}
