//! End-to-end tests: fake webinar API in, webhook receiver out.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use panelwatch_client::ClientConfig;
use panelwatch_core::DetectorConfig;
use panelwatch_server::{build_detector, Poller, SinkConfig, WatcherConfig};

#[derive(Clone, Default)]
struct World {
    /// Panelists currently returned for webinar 111.
    panelists: Arc<Mutex<Value>>,
    /// Bodies received by the webhook.
    received: Arc<Mutex<Vec<Value>>>,
    /// Status the webhook answers with.
    webhook_status: Arc<Mutex<u16>>,
}

async fn list_panelists(
    State(world): State<World>,
    Path(webinar_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if webinar_id != "111" {
        return Err(StatusCode::NOT_FOUND);
    }
    let panelists = world.panelists.lock().unwrap().clone();
    Ok(Json(json!({ "panelists": panelists })))
}

async fn webhook(State(world): State<World>, Json(body): Json<Value>) -> StatusCode {
    let status = *world.webhook_status.lock().unwrap();
    if status == 200 {
        world.received.lock().unwrap().push(body);
    }
    StatusCode::from_u16(status).unwrap()
}

async fn spawn_world(world: World) -> String {
    let router = Router::new()
        .route("/v2/webinars/:id/panelists", get(list_panelists))
        .route("/hook", post(webhook))
        .with_state(world);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn watcher_config(base: &str, data: &std::path::Path) -> WatcherConfig {
    WatcherConfig::new(data)
        .with_client(
            ClientConfig::new(format!("{}/v2", base))
                .with_token("t")
                .with_timeout(Duration::from_secs(5)),
        )
        .with_detector(DetectorConfig::new().with_webinars(["111"]))
        .with_sink(SinkConfig::Webhook {
            url: format!("{}/hook", base),
        })
}

fn received_ids(world: &World) -> Vec<String> {
    world
        .received
        .lock()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_webhook_receives_lifecycle() {
    let world = World::default();
    *world.webhook_status.lock().unwrap() = 200;
    *world.panelists.lock().unwrap() = json!([
        {"id": "pa", "email": "a@x.com", "name": "Ada"},
        {"id": "pb", "email": "b@x.com"}
    ]);
    let base = spawn_world(world.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let config = watcher_config(&base, dir.path());
    let poller = Poller::new(build_detector(&config).unwrap(), config.interval);

    let report = poller.run_once().await.unwrap();
    assert_eq!(report.total_events(), 2);
    assert_eq!(
        received_ids(&world),
        vec!["pa-panelist.added", "pb-panelist.added"]
    );

    let first = world.received.lock().unwrap()[0].clone();
    assert_eq!(first["summary"], "panelist.added - Ada - a@x.com");
    assert_eq!(first["event"]["eventType"], "panelist.added");
    assert_eq!(first["event"]["webinarID"], "111");
    assert_eq!(first["event"]["name"], "Ada");

    // pa renamed, pb removed
    world.received.lock().unwrap().clear();
    *world.panelists.lock().unwrap() = json!([
        {"id": "pa", "email": "a@x.com", "name": "Ada L."}
    ]);

    poller.run_once().await.unwrap();
    assert_eq!(
        received_ids(&world),
        vec!["pb-panelist.deleted", "pa-panelist.changed"]
    );

    let deleted = world.received.lock().unwrap()[0].clone();
    assert_eq!(deleted["summary"], "panelist.deleted - b@x.com");

    // Nothing changed
    world.received.lock().unwrap().clear();
    let report = poller.run_once().await.unwrap();
    assert!(report.is_empty());
    assert!(received_ids(&world).is_empty());
}

#[tokio::test]
async fn test_webhook_failure_retries_next_run() {
    let world = World::default();
    *world.webhook_status.lock().unwrap() = 503;
    *world.panelists.lock().unwrap() = json!([{"id": "pa", "email": "a@x.com"}]);
    let base = spawn_world(world.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let config = watcher_config(&base, dir.path());
    let poller = Poller::new(build_detector(&config).unwrap(), config.interval);

    assert!(poller.run_once().await.is_err());
    assert!(received_ids(&world).is_empty());

    // Snapshot was not committed, so the event is delivered once the hook recovers
    *world.webhook_status.lock().unwrap() = 200;
    let report = poller.run_once().await.unwrap();
    assert_eq!(report.total_events(), 1);
    assert_eq!(received_ids(&world), vec!["pa-panelist.added"]);
}

#[tokio::test]
async fn test_snapshots_survive_restart() {
    let world = World::default();
    *world.webhook_status.lock().unwrap() = 200;
    *world.panelists.lock().unwrap() = json!([{"id": "pa", "email": "a@x.com"}]);
    let base = spawn_world(world.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    {
        let config = watcher_config(&base, dir.path());
        let poller = Poller::new(build_detector(&config).unwrap(), config.interval);
        assert_eq!(poller.run_once().await.unwrap().total_events(), 1);
    }

    let config = watcher_config(&base, dir.path());
    let poller = Poller::new(build_detector(&config).unwrap(), config.interval);
    assert!(poller.run_once().await.unwrap().is_empty());
    assert_eq!(received_ids(&world).len(), 1);
}
