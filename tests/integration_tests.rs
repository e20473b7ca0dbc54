// Integration tests: HTTP endpoints over a stub eero client

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{StubClient, StubLogin, devices_fixture, eeros_fixture};
use eero_dashboard::aggregator::Aggregator;
use eero_dashboard::config::AppConfig;
use eero_dashboard::networks::NetworkManager;
use eero_dashboard::routes;
use eero_dashboard::token_store::TokenStore;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    server: TestServer,
    aggregator: Arc<Aggregator>,
    networks: Arc<NetworkManager>,
    dir: TempDir,
}

fn test_config(dir: &std::path::Path) -> AppConfig {
    AppConfig::load_from_str(&format!(
        r#"
[server]
port = 8081
host = "0.0.0.0"

[storage]
dir = "{}"

[[networks]]
id = "100"
name = "Home"
email = "me@example.com"

[[networks]]
id = "200"
name = "Cabin"
"#,
        dir.display()
    ))
    .unwrap()
}

/// Network 100 is authenticated and has data; 200 has no token yet.
fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let tokens = Arc::new(TokenStore::load(dir.path(), ["100", "200"]).unwrap());
    tokens.promote("100", "token-100").unwrap();
    let networks = Arc::new(NetworkManager::new(
        config.clone(),
        Some(dir.path().join("config.toml")),
        tokens,
    ));
    let client = Arc::new(
        StubClient::default()
            .with_network("100", devices_fixture(), eeros_fixture())
            .with_network("200", devices_fixture(), vec![]),
    );
    let aggregator = Arc::new(Aggregator::new(client, networks.clone(), 168));
    let app = routes::app(aggregator.clone(), networks.clone(), Arc::new(StubLogin), config);
    Harness {
        server: TestServer::new(app),
        aggregator,
        networks,
        dir,
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let h = harness();
    let response = h.server.get("/health").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].as_str().is_some());
}

#[tokio::test]
async fn test_version_endpoint() {
    let h = harness();
    for path in ["/version", "/api/version"] {
        let response = h.server.get(path).await;
        response.assert_status_ok();
        let json: Value = response.json();
        assert_eq!(json["name"], "eero-dashboard");
        assert_eq!(json["api_url"], "api-user.e2ro.com");
        assert_eq!(json["authenticated"], true);
        assert!(json["timestamp"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_index_serves_placeholder_then_static_page() {
    let h = harness();
    let response = h.server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("location.reload()"));
    assert_eq!(
        response.header("cache-control"),
        "no-cache, no-store, must-revalidate"
    );

    let static_dir = h.dir.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<html>dashboard</html>").unwrap();
    let response = h.server.get("/").await;
    response.assert_text("<html>dashboard</html>");
}

#[tokio::test]
async fn test_dashboard_is_empty_before_first_cycle() {
    let h = harness();
    let response = h.server.get("/api/dashboard").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total_devices"], 0);
    assert_eq!(json["last_update"], Value::Null);
    assert_eq!(json["connected_users"], json!([]));
    assert_eq!(json["device_os"]["iOS"], 0);
}

#[tokio::test]
async fn test_refresh_then_dashboard() {
    let h = harness();
    let response = h.server.post("/api/refresh").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["ran"], true);
    assert_eq!(json["report"]["processed"], json!(["100"]));

    let json: Value = h.server.get("/api/dashboard").await.json();
    assert_eq!(json["total_devices"], 4);
    assert_eq!(json["wireless_devices"], 3);
    assert_eq!(json["frequency_distribution"]["2.4GHz"], 2);
    assert_eq!(json["active_networks"], 1);
    assert_eq!(json["connected_users"].as_array().unwrap().len(), 1);
    assert_eq!(json["signal_strength_avg"][0]["avg_dbm"], -65.0);

    // time range is accepted but not applied
    let filtered: Value = h.server.get("/api/dashboard/24").await.json();
    assert_eq!(filtered["total_devices"], 4);

    let devices: Value = h.server.get("/api/devices").await.json();
    assert_eq!(devices["count"], 4);
    assert_eq!(devices["devices"][0]["name"], "Kitchen iPad");
    assert_eq!(devices["devices"][0]["signal_quality"], "Very Good");
    assert_eq!(devices["devices"][0]["access_point"], "/2.2/eeros/101");
}

#[tokio::test]
async fn test_network_detail_and_missing_network() {
    let h = harness();
    h.aggregator.trigger_cycle().await;

    let json: Value = h.server.get("/api/networks/100").await.json();
    assert_eq!(json["network_name"], "Home");
    assert_eq!(json["distribution"]["status"], "distributed");

    let response = h.server.get("/api/networks/200").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_networks_list_reports_authentication() {
    let h = harness();
    let json: Value = h.server.get("/api/networks").await.json();
    assert_eq!(json["total"], 2);
    assert_eq!(json["max"], 6);
    assert_eq!(json["networks"][0]["authenticated"], true);
    assert_eq!(json["networks"][1]["authenticated"], false);
    assert!(json["networks"][0].get("token").is_none());
}

#[tokio::test]
async fn test_network_stats_and_ap_data() {
    let h = harness();
    h.aggregator.trigger_cycle().await;

    let stats: Value = h.server.get("/api/network-stats").await.json();
    assert_eq!(stats["total_networks"], 2);
    assert_eq!(stats["networks"][0]["total_devices"], 4);
    assert_eq!(stats["networks"][1]["total_devices"], 0);
    assert_eq!(stats["networks"][1]["last_successful_update"], Value::Null);
    assert_eq!(stats["combined_stats"]["total_devices"], 4);

    let ap: Value = h.server.get("/api/ap-data").await.json();
    let home = &ap["networks"]["100"];
    assert_eq!(home["network_name"], "Home");
    assert_eq!(home["ap_data"].as_object().unwrap().len(), 2);
    assert_eq!(home["ap_data"]["/2.2/eeros/101"]["model"], "eero Max 7");
    assert_eq!(ap["networks"]["200"]["ap_data"], json!({}));
}

#[tokio::test]
async fn test_debug_signal() {
    let h = harness();
    h.aggregator.trigger_cycle().await;
    let json: Value = h.server.get("/api/debug/signal").await.json();
    assert_eq!(json["combined_signal_count"], 1);
    assert_eq!(json["networks"]["100"]["signal_count"], 1);
    assert_eq!(json["networks"]["100"]["wireless_devices"], 3);
}

#[tokio::test]
async fn test_csv_export() {
    let h = harness();
    h.aggregator.trigger_cycle().await;
    let response = h.server.get("/api/export/csv").await;
    response.assert_status_ok();
    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=eero_network_export_"));
    let body = response.text();
    let rows: Vec<&str> = body.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with("Home,100,Yes,Yes,4,3,1,"));
    assert!(rows[2].ends_with("https://insight.eero.com/networks/200"));
}

#[tokio::test]
async fn test_admin_add_rename_toggle_remove() {
    let h = harness();

    let response = h
        .server
        .post("/api/admin/networks")
        .json(&json!({ "network_id": "300", "email": "x@example.com" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["network"]["name"], "Network 300");

    let response = h
        .server
        .post("/api/admin/networks")
        .json(&json!({ "network_id": "300", "email": "x@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = h
        .server
        .post("/api/admin/networks")
        .json(&json!({ "network_id": "abc", "email": "x@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = h
        .server
        .post("/api/admin/networks/300/rename")
        .json(&json!({ "name": "Garage" }))
        .await;
    response.assert_status_ok();
    assert_eq!(h.networks.get("300").unwrap().name, "Garage");

    let response = h
        .server
        .post("/api/admin/networks/300/rename")
        .json(&json!({ "name": "x".repeat(51) }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    h.server.post("/api/admin/networks/300/toggle").await.assert_status_ok();
    assert!(!h.networks.get("300").unwrap().active);

    let saved = std::fs::read_to_string(h.dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("Garage"));

    h.server.delete("/api/admin/networks/300").await.assert_status_ok();
    assert!(h.networks.get("300").is_none());
    h.server
        .delete("/api/admin/networks/300")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_flow_send_then_verify() {
    let h = harness();

    let response = h
        .server
        .post("/api/admin/networks/200/auth")
        .json(&json!({ "step": "verify", "code": "123456" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Please restart authentication process"
    );

    let response = h
        .server
        .post("/api/admin/networks/200/auth")
        .json(&json!({ "step": "send" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = h
        .server
        .post("/api/admin/networks/200/auth")
        .json(&json!({ "step": "send", "email": "cabin@example.com" }))
        .await;
    response.assert_status_ok();
    assert!(h.dir.path().join(".eero_token_200.temp").exists());
    assert_eq!(h.networks.get("200").unwrap().email, "cabin@example.com");

    let response = h
        .server
        .post("/api/admin/networks/200/auth")
        .json(&json!({ "step": "verify", "code": "000000" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(!h.networks.get("200").unwrap().authenticated);

    let response = h
        .server
        .post("/api/admin/networks/200/auth")
        .json(&json!({ "step": "verify", "code": "123456" }))
        .await;
    response.assert_status_ok();
    assert!(h.networks.get("200").unwrap().authenticated);
    assert!(h.dir.path().join(".eero_token_200").exists());

    h.aggregator.trigger_cycle().await;
    assert!(h.aggregator.network_snapshot("200").await.is_some());
}

#[tokio::test]
async fn test_auth_unknown_network() {
    let h = harness();
    h.server
        .post("/api/admin/networks/999/auth")
        .json(&json!({ "step": "send", "email": "a@b.c" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
