//! Shared fixtures for integration tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;

use snapshot_api::config::ApiConfig;
use snapshot_api::http::{AppState, HttpServer};
use snapshot_api::model::{ConfigMessage, Snapshot};
use snapshot_api::observability::RequestStatistics;
use snapshot_api::publisher::{PublisherSettings, UpdatePublisher};
use snapshot_api::store::SnapshotStore;

pub const WEB_BODY: &str =
    r#"{"backends":{"wb":{"servers":{"ws":{"url":"http://10.0.0.9:8080","weight":3}}}}}"#;

/// Snapshot with provider `docker` → backend `b1` → server `s1`, and a frontend with one route.
pub fn docker_snapshot() -> Snapshot {
    serde_json::from_value(json!({
        "docker": {
            "backends": {
                "b1": {
                    "loadBalancer": { "method": "wrr" },
                    "servers": { "s1": { "url": "http://172.17.0.2:80", "weight": 1 } }
                }
            },
            "frontends": {
                "f1": {
                    "backend": "b1",
                    "entryPoints": ["http"],
                    "routes": { "r1": { "rule": "Host:whoami.docker.local" } }
                }
            }
        }
    }))
    .unwrap()
}

/// A router wired to a store and a channel the test controls.
pub struct TestApi {
    pub router: Router,
    pub store: Arc<SnapshotStore>,
    pub updates: mpsc::Receiver<ConfigMessage>,
}

pub fn test_api(config: ApiConfig, snapshot: Snapshot) -> TestApi {
    test_api_with_capacity(config, snapshot, 8)
}

pub fn test_api_with_capacity(config: ApiConfig, snapshot: Snapshot, capacity: usize) -> TestApi {
    let store = Arc::new(SnapshotStore::with_snapshot(snapshot));
    let (sender, updates) = mpsc::channel(capacity);
    let publisher = UpdatePublisher::new(
        sender,
        PublisherSettings {
            provider_name: config.api.provider_name.clone(),
            read_only: config.api.read_only,
            submit_timeout: Duration::from_millis(config.api.submit_timeout_ms),
        },
    );
    let state = AppState {
        store: store.clone(),
        publisher,
        stats: Arc::new(RequestStatistics::new()),
        max_body_bytes: config.api.max_body_bytes,
    };
    let router = HttpServer::new(config, state).router();
    TestApi { router, store, updates }
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    send(router, Method::GET, uri, Body::empty()).await
}

pub async fn put(router: &Router, uri: &str, body: &str) -> Response<Body> {
    send(router, Method::PUT, uri, Body::from(body.to_string())).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let text = body_text(response).await;
    serde_json::from_str(&text).unwrap()
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = get(router, uri).await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Recorder capturing the `outcome` label of every write path submission.
#[derive(Clone, Default)]
pub struct OutcomeRecorder {
    outcomes: Arc<Mutex<Vec<String>>>,
}

impl OutcomeRecorder {
    pub fn outcomes(&self) -> Vec<String> {
        self.outcomes.lock().unwrap().clone()
    }
}

struct OutcomeCounter {
    outcome: String,
    outcomes: Arc<Mutex<Vec<String>>>,
}

impl metrics::CounterFn for OutcomeCounter {
    fn increment(&self, _value: u64) {
        self.outcomes.lock().unwrap().push(self.outcome.clone());
    }

    fn absolute(&self, _value: u64) {}
}

impl metrics::Recorder for OutcomeRecorder {
    fn describe_counter(&self, _: metrics::KeyName, _: Option<metrics::Unit>, _: metrics::SharedString) {}

    fn describe_gauge(&self, _: metrics::KeyName, _: Option<metrics::Unit>, _: metrics::SharedString) {}

    fn describe_histogram(&self, _: metrics::KeyName, _: Option<metrics::Unit>, _: metrics::SharedString) {}

    fn register_counter(&self, key: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Counter {
        if key.name() != "config_submissions_total" {
            return metrics::Counter::noop();
        }
        let outcome = key
            .labels()
            .find(|label| label.key() == "outcome")
            .map(|label| label.value().to_string())
            .unwrap_or_default();
        metrics::Counter::from_arc(Arc::new(OutcomeCounter {
            outcome,
            outcomes: self.outcomes.clone(),
        }))
    }

    fn register_gauge(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Gauge {
        metrics::Gauge::noop()
    }

    fn register_histogram(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Histogram {
        metrics::Histogram::noop()
    }
}

/// Run `test` on a current-thread runtime with `recorder` installed for this thread.
pub fn with_recorder<F>(recorder: &OutcomeRecorder, test: F)
where
    F: std::future::Future<Output = ()>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    metrics::with_local_recorder(recorder, || runtime.block_on(test));
}
