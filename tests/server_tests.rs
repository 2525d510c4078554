//! End-to-end tests against a bound listener with the real merge pipeline.

use std::time::Duration;
use serde_json::{json, Value};

use snapshot_api::config::ApiConfig;
use snapshot_api::lifecycle::{start_services, Shutdown};
use snapshot_api::HttpServer;

mod common;

async fn start(config: ApiConfig) -> (String, Shutdown, tokio::task::JoinHandle<()>) {
    let shutdown = Shutdown::new();
    let services = start_services(&config, &shutdown).unwrap();
    let server = HttpServer::new(config, services.state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{addr}"), shutdown, services.merger)
}

async fn wait_for<F>(client: &reqwest::Client, url: &str, mut ready: F) -> Value
where
    F: FnMut(&Value) -> bool,
{
    for _ in 0..100 {
        let res = client.get(url).send().await.unwrap();
        if res.status().is_success() {
            let body: Value = res.json().await.unwrap();
            if ready(&body) {
                return body;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached for {url}");
}

#[tokio::test]
async fn test_update_becomes_visible_eventually() {
    let (base, shutdown, merger) = start(ApiConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{base}/api/providers/web"))
        .body(common::WEB_BODY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    // The response may or may not include the update; it is valid JSON either way.
    let _: Value = res.json().await.unwrap();

    let server = wait_for(
        &client,
        &format!("{base}/api/providers/web/backends/wb/servers/ws"),
        |_| true,
    )
    .await;
    assert_eq!(server, json!({ "url": "http://10.0.0.9:8080", "weight": 3 }));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), merger)
        .await
        .expect("merger stops on shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_seed_file_and_read_only() {
    let mut seed = tempfile::NamedTempFile::new().unwrap();
    serde_json::to_writer(&mut seed, &common::docker_snapshot()).unwrap();

    let mut config = ApiConfig::default();
    config.api.read_only = true;
    config.pipeline.seed_file = Some(seed.path().to_string_lossy().into_owned());
    let (base, shutdown, _merger) = start(config).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{base}/api/providers/docker/backends/b1/servers/s1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .put(format!("{base}/api/providers/web"))
        .body(common::WEB_BODY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot: Value = client
        .get(format!("{base}/api/providers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot, serde_json::to_value(common::docker_snapshot()).unwrap());

    shutdown.trigger();
}
