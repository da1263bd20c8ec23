//! End-to-end smoke tests for the full zonehubd stack.
//!
//! Each test wires the complete application (JSON state file in a temp
//! directory, real event bus, organiser, aggregator, metadata sync, virtual
//! gateways, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tower::ServiceExt;
use zonehub_adapter_http_axum::router;
use zonehub_adapter_http_axum::state::AppState;
use zonehub_adapter_storage_file::FileSection;
use zonehub_adapter_virtual::VirtualGateway;
use zonehub_app::aggregator::GatewayAggregator;
use zonehub_app::event_bus::EventBus;
use zonehub_app::metadata_sync;
use zonehub_app::organiser::DeviceOrganiser;
use zonehub_domain::id::DeviceId;

/// A running hub over one state file.
struct Hub {
    state: AppState<FileSection>,
    gateway: Arc<VirtualGateway>,
    sync: JoinHandle<()>,
}

impl Hub {
    /// Wire every component over `path`, with one virtual gateway `virtual`
    /// exposing two switches.
    fn start(path: &Path) -> Self {
        let root = FileSection::open(path).expect("state file should open");
        let event_bus = Arc::new(EventBus::new());
        let organiser = Arc::new(DeviceOrganiser::new(&root, Arc::clone(&event_bus)));
        let aggregator = Arc::new(GatewayAggregator::new(Arc::clone(&event_bus)));
        let sync = metadata_sync::spawn(
            Arc::clone(&organiser),
            event_bus.subscription(metadata_sync::SUBSCRIPTION_CAPACITY),
        );

        let gateway = Arc::new(VirtualGateway::new("virtual", 2));
        aggregator
            .add("virtual", gateway.clone())
            .expect("gateway name should be free");

        Self {
            state: AppState::new(organiser, aggregator, event_bus),
            gateway,
            sync,
        }
    }

    async fn stop(self) {
        self.state.aggregator.stop();
        self.state.aggregator.wait().await;
        self.sync.abort();
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        };
        let resp = router::build(self.state.clone())
            .oneshot(request.unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Wait until the metadata sync has caught up with both switches.
    async fn synced(&self) {
        for _ in 0..200 {
            let known = ["virtual-1", "virtual-2"]
                .iter()
                .all(|id| self.state.organiser.device(&DeviceId::new(*id)).is_some());
            if known {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("virtual devices were never synced");
    }
}

/// Unique state file path, removed on drop.
struct TempState(PathBuf);

impl TempState {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("zonehubd-{}.json", uuid::Uuid::new_v4())))
    }
}

impl Drop for TempState {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let file = TempState::new();
    let hub = Hub::start(&file.0);

    let (status, _) = hub.send("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    hub.stop().await;
}

// ---------------------------------------------------------------------------
// Gateways and devices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_list_virtual_gateway() {
    let file = TempState::new();
    let hub = Hub::start(&file.0);

    let (status, body) = hub.send("GET", "/api/gateways", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "virtual");
    assert_eq!(body[0]["device"]["identifier"], "virtual-coordinator");

    hub.stop().await;
}

#[tokio::test]
async fn should_create_metadata_for_announced_devices() {
    let file = TempState::new();
    let hub = Hub::start(&file.0);
    hub.synced().await;

    let (status, body) = hub.send("GET", "/api/devices", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|device| device["identifier"].as_str())
        .collect();
    assert_eq!(ids, ["virtual-1", "virtual-2"]);
    assert_eq!(body[0]["gateway"], "virtual");
    assert_eq!(body[0]["name"], "");

    hub.stop().await;
}

#[tokio::test]
async fn should_sync_devices_injected_at_runtime() {
    let file = TempState::new();
    let hub = Hub::start(&file.0);
    hub.gateway.handle().add_device("virtual-3");

    let id = DeviceId::new("virtual-3");
    for _ in 0..200 {
        if hub.state.organiser.device(&id).is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (status, body) = hub.send("GET", "/api/devices/virtual-3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gateway"], "virtual");

    hub.stop().await;
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_organise_devices_into_zones() {
    let file = TempState::new();
    let hub = Hub::start(&file.0);
    hub.synced().await;

    let (status, kitchen) = hub
        .send("POST", "/api/zones", Some(json!({"name": "Kitchen"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let kitchen = kitchen["identifier"].as_u64().unwrap();

    let (_, pantry) = hub
        .send("POST", "/api/zones", Some(json!({"name": "Pantry"})))
        .await;
    let pantry = pantry["identifier"].as_u64().unwrap();

    let (status, _) = hub
        .send(
            "PATCH",
            &format!("/api/zones/{pantry}"),
            Some(json!({"parent_zone": kitchen})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = hub
        .send(
            "PUT",
            &format!("/api/zones/{pantry}/devices/virtual-1"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, roots) = hub.send("GET", "/api/zones", None).await;
    assert_eq!(roots.as_array().unwrap().len(), 1);
    assert_eq!(roots[0]["sub_zones"], json!([pantry]));

    let (_, device) = hub.send("GET", "/api/devices/virtual-1", None).await;
    assert_eq!(device["zones"], json!([pantry]));

    // Kitchen cannot go away while it has a sub-zone.
    let (status, _) = hub
        .send("DELETE", &format!("/api/zones/{kitchen}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Nor can Kitchen move under its own child.
    let (status, _) = hub
        .send(
            "PATCH",
            &format!("/api/zones/{kitchen}"),
            Some(json!({"parent_zone": pantry})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    hub.stop().await;
}

#[tokio::test]
async fn should_restore_layout_after_restart() {
    let file = TempState::new();

    let hub = Hub::start(&file.0);
    hub.synced().await;
    let (_, living) = hub
        .send("POST", "/api/zones", Some(json!({"name": "Living"})))
        .await;
    let (_, bedroom) = hub
        .send("POST", "/api/zones", Some(json!({"name": "Bedroom"})))
        .await;
    let living = living["identifier"].as_u64().unwrap();
    let bedroom = bedroom["identifier"].as_u64().unwrap();
    hub.send(
        "PATCH",
        &format!("/api/zones/{bedroom}"),
        Some(json!({"reorder": {"before": living}})),
    )
    .await;
    hub.send(
        "PATCH",
        "/api/devices/virtual-2",
        Some(json!({"name": "Bedside lamp"})),
    )
    .await;
    hub.send(
        "PUT",
        &format!("/api/zones/{bedroom}/devices/virtual-2"),
        None,
    )
    .await;
    hub.stop().await;

    let hub = Hub::start(&file.0);

    let (_, roots) = hub.send("GET", "/api/zones", None).await;
    let order: Vec<u64> = roots
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|zone| zone["identifier"].as_u64())
        .collect();
    assert_eq!(order, [bedroom, living]);
    assert_eq!(roots[0]["devices"], json!(["virtual-2"]));

    let (_, device) = hub.send("GET", "/api/devices/virtual-2", None).await;
    assert_eq!(device["name"], "Bedside lamp");
    assert_eq!(device["zones"], json!([bedroom]));

    // Identifiers keep counting from where the previous run stopped.
    let (_, office) = hub
        .send("POST", "/api/zones", Some(json!({"name": "Office"})))
        .await;
    assert!(office["identifier"].as_u64().unwrap() > bedroom.max(living));

    hub.stop().await;
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_stream_capability_updates() {
    let file = TempState::new();
    let hub = Hub::start(&file.0);
    hub.synced().await;

    let mut subscription = hub.state.event_bus.subscription(16);
    hub.gateway
        .on_off()
        .set(&DeviceId::new("virtual-1"), true)
        .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            let event = subscription.recv().await.unwrap();
            let json = serde_json::to_value(&event).unwrap();
            if json["event"]["type"] == "capability_updated" {
                return json;
            }
        }
    })
    .await
    .expect("capability update should be published");

    assert_eq!(event["source"], "gateway");
    assert_eq!(event["event"]["device"]["identifier"], "virtual-1");
    assert_eq!(event["event"]["value"], json!(true));

    hub.stop().await;
}
