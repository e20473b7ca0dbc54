// HTTP routes: dashboard data, admin network management, CSV export

mod admin;
mod error;
mod export;
mod http;

pub use error::ApiError;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::Aggregator;
use crate::config::AppConfig;
use crate::eero_client::LoginClient;
use crate::networks::NetworkManager;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) aggregator: Arc<Aggregator>,
    pub(crate) networks: Arc<NetworkManager>,
    pub(crate) login: Arc<dyn LoginClient>,
    pub(crate) config: Arc<AppConfig>,
}

pub fn app(
    aggregator: Arc<Aggregator>,
    networks: Arc<NetworkManager>,
    login: Arc<dyn LoginClient>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        aggregator,
        networks,
        login,
        config: Arc::new(config),
    };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/health", get(http::health_handler)) // GET /health
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/version", get(http::version_handler)) // GET /api/version
        .route("/api/dashboard", get(http::dashboard_handler)) // GET /api/dashboard
        .route("/api/dashboard/{hours}", get(http::dashboard_hours_handler)) // GET /api/dashboard/{hours}
        .route("/api/devices", get(http::devices_handler)) // GET /api/devices
        .route("/api/networks", get(http::networks_handler)) // GET /api/networks
        .route("/api/networks/{id}", get(http::network_handler)) // GET /api/networks/{id}
        .route("/api/network-stats", get(http::network_stats_handler)) // GET /api/network-stats
        .route("/api/ap-data", get(http::ap_data_handler)) // GET /api/ap-data
        .route("/api/debug/signal", get(http::debug_signal_handler)) // GET /api/debug/signal
        .route("/api/refresh", post(http::refresh_handler)) // POST /api/refresh
        .route("/api/export/csv", get(export::csv_handler)) // GET /api/export/csv
        .route("/api/admin/networks", post(admin::add_network)) // POST /api/admin/networks
        .route("/api/admin/networks/{id}", delete(admin::remove_network)) // DELETE /api/admin/networks/{id}
        .route("/api/admin/networks/{id}/rename", post(admin::rename_network)) // POST .../rename
        .route("/api/admin/networks/{id}/toggle", post(admin::toggle_network)) // POST .../toggle
        .route("/api/admin/networks/{id}/auth", post(admin::authenticate_network)) // POST .../auth
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .with_state(state)
}
