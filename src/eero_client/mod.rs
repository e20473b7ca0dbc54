// eero user API client (devices, eeros, login) via reqwest.

mod auth;

pub use auth::LoginClient;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, debug_span, warn};

use crate::config::ApiConfig;
use crate::models::{RawDevice, RawEero};
use crate::token_store::TokenStore;
use crate::version;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network {0} is not authenticated")]
    NotAuthenticated(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Source of raw telemetry for one network. The aggregator only sees this trait.
pub trait NetworkClient: Send + Sync {
    fn fetch_devices<'a>(
        &'a self,
        network_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawDevice>, ClientError>>;

    fn fetch_topology<'a>(
        &'a self,
        network_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawEero>, ClientError>>;
}

#[derive(Clone)]
pub struct EeroClient {
    http: Client,
    base_url: String,
    auth_timeout: Duration,
    tokens: Arc<TokenStore>,
}

impl EeroClient {
    pub fn new(config: &ApiConfig, tokens: Arc<TokenStore>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(version::user_agent())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url(),
            auth_timeout: Duration::from_secs(config.auth_timeout_secs),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_data(&self, network_id: &str, resource: &str) -> Result<Value, ClientError> {
        let token = self
            .tokens
            .get(network_id)
            .ok_or_else(|| ClientError::NotAuthenticated(network_id.to_string()))?;
        let url = format!("{}/networks/{}/{}", self.base_url, network_id, resource);
        let body: Value = self
            .http
            .get(url)
            .header("X-User-Token", token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body)
    }
}

impl NetworkClient for EeroClient {
    fn fetch_devices<'a>(
        &'a self,
        network_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawDevice>, ClientError>> {
        Box::pin(async move {
            let body = self.get_data(network_id, "devices").await?;
            let devices = parse_device_list(&body);
            debug!(devices = devices.len(), "devices fetched");
            Ok(devices)
        }
        .instrument(debug_span!("fetch_devices", client = "eero", network_id)))
    }

    fn fetch_topology<'a>(
        &'a self,
        network_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawEero>, ClientError>> {
        Box::pin(async move {
            let body = self.get_data(network_id, "eeros").await?;
            let eeros = parse_eero_list(&body);
            debug!(eeros = eeros.len(), "eeros fetched");
            Ok(eeros)
        }
        .instrument(debug_span!("fetch_topology", client = "eero", network_id)))
    }
}

/// `{"data": [...]}` or `{"data": {"devices": [...]}}`; anything else is empty.
pub fn parse_device_list(body: &Value) -> Vec<RawDevice> {
    let items = match body.get("data") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(data @ Value::Object(_)) => data
            .get("devices")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };
    parse_records(items, "device")
}

/// `{"data": [...]}`; anything else is empty.
pub fn parse_eero_list(body: &Value) -> Vec<RawEero> {
    let items = body
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    parse_records(items, "eero")
}

/// Records that fail to deserialize are dropped, not fatal.
fn parse_records<T: DeserializeOwned>(items: &[Value], kind: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(kind, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}
