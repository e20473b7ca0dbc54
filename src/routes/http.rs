// GET handlers: dashboard page, health/version, snapshots, refresh

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use serde_json::{Map, Value, json};

use super::{ApiError, AppState};
use crate::aggregator::CycleOutcome;
use crate::version::{NAME, VERSION};

const PLACEHOLDER_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>eero Dashboard</title></head>
<body><h1>Dashboard Loading...</h1>
<p>Please wait while the dashboard initializes.</p>
<script>setTimeout(() => location.reload(), 5000);</script>
</body></html>"#;

const NO_CACHE: [(header::HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// GET /: `static/index.html` from the storage dir, or a self-reloading placeholder.
pub(super) async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let path = std::path::Path::new(&state.config.storage.dir)
        .join("static")
        .join("index.html");
    let page = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "dashboard page unavailable; serving placeholder");
            PLACEHOLDER_PAGE.to_string()
        }
    };
    (NO_CACHE, Html(page))
}

/// GET /health
pub(super) async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "version": VERSION }))
}

/// GET /version, GET /api/version
pub(super) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": NAME,
        "version": VERSION,
        "api_url": state.config.api.url,
        "authenticated": state.networks.tokens().count() > 0,
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}

/// GET /api/dashboard: latest combined snapshot; polling happens in the worker.
pub(super) async fn dashboard_handler(State(state): State<AppState>) -> Response {
    let combined = state.aggregator.combined_snapshot().await;
    Json(&*combined).into_response()
}

/// GET /api/dashboard/{hours}: the histories are not filtered; same body as /api/dashboard.
pub(super) async fn dashboard_hours_handler(
    Path(_hours): Path<u32>,
    state: State<AppState>,
) -> Response {
    dashboard_handler(state).await
}

/// GET /api/devices
pub(super) async fn devices_handler(State(state): State<AppState>) -> Response {
    let combined = state.aggregator.combined_snapshot().await;
    Json(json!({
        "devices": combined.devices,
        "count": combined.devices.len(),
    }))
    .into_response()
}

/// GET /api/networks: configured networks with their authentication state.
pub(super) async fn networks_handler(State(state): State<AppState>) -> impl IntoResponse {
    let networks = state.networks.list();
    Json(json!({
        "networks": networks,
        "total": networks.len(),
        "max": crate::config::MAX_NETWORKS,
    }))
}

/// GET /api/networks/{id}
pub(super) async fn network_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let snapshot = state
        .aggregator
        .network_snapshot(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("No data for network {}", id)))?;
    Ok(Json(&*snapshot).into_response())
}

/// GET /api/network-stats: one entry per active network, zeroed until it has data.
pub(super) async fn network_stats_handler(State(state): State<AppState>) -> Response {
    let snapshots = state.aggregator.network_snapshots().await;
    let stats: Vec<Value> = state
        .networks
        .list()
        .into_iter()
        .filter(|n| n.active)
        .map(|n| match snapshots.get(&n.id) {
            Some(s) => json!({
                "id": n.id,
                "name": n.name,
                "authenticated": n.authenticated,
                "total_devices": s.total_devices,
                "wireless_devices": s.wireless_devices,
                "wired_devices": s.wired_devices,
                "device_os": s.device_os,
                "frequency_distribution": s.frequency_distribution,
                "last_successful_update": s.last_successful_update,
            }),
            None => json!({
                "id": n.id,
                "name": n.name,
                "authenticated": n.authenticated,
                "total_devices": 0,
                "wireless_devices": 0,
                "wired_devices": 0,
                "device_os": {},
                "frequency_distribution": {},
                "last_successful_update": null,
            }),
        })
        .collect();
    let combined = state.aggregator.combined_snapshot().await;
    Json(json!({
        "total_networks": stats.len(),
        "networks": stats,
        "combined_stats": &*combined,
    }))
    .into_response()
}

/// GET /api/ap-data: AP maps of every active network.
pub(super) async fn ap_data_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut networks = Map::new();
    for n in state.networks.list().into_iter().filter(|n| n.active) {
        let ap_data = state.aggregator.ap_data(&n.id).await;
        networks.insert(
            n.id.clone(),
            json!({
                "network_name": n.name,
                "ap_data": ap_data,
                "authenticated": n.authenticated,
            }),
        );
    }
    Json(json!({ "networks": networks }))
}

/// GET /api/debug/signal: signal histories per network and combined.
pub(super) async fn debug_signal_handler(State(state): State<AppState>) -> impl IntoResponse {
    let combined = state.aggregator.combined_snapshot().await;
    let mut networks = Map::new();
    for (id, s) in state.aggregator.network_snapshots().await {
        networks.insert(
            id,
            json!({
                "signal_data": s.signal_strength_avg,
                "signal_count": s.signal_strength_avg.len(),
                "wireless_devices": s.wireless_devices,
                "last_update": s.last_update,
            }),
        );
    }
    Json(json!({
        "combined_signal_data": combined.signal_strength_avg,
        "combined_signal_count": combined.signal_strength_avg.len(),
        "networks": networks,
    }))
}

/// POST /api/refresh: runs a cycle now unless one is already running.
pub(super) async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.aggregator.trigger_cycle().await {
        CycleOutcome::Completed(report) => Json(json!({
            "success": true,
            "ran": true,
            "report": report,
        })),
        CycleOutcome::AlreadyRunning => Json(json!({
            "success": true,
            "ran": false,
            "message": "A refresh is already in progress",
        })),
    }
}
