use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Upper bound on monitored networks.
pub const MAX_NETWORKS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host of the eero user API; a full `http(s)://` base is also accepted.
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_api_version")]
    pub version: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_auth_timeout_secs")]
    pub auth_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            auth_timeout_secs: default_auth_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// e.g. `https://api-user.e2ro.com/2.2`
    pub fn base_url(&self) -> String {
        let host = self.url.trim_end_matches('/');
        let version = self.version.trim_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}/{}", host, version)
        } else {
            format!("https://{}/{}", host, version)
        }
    }
}

fn default_api_url() -> String {
    "api-user.e2ro.com".into()
}

fn default_api_version() -> String {
    "2.2".into()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_auth_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Samples kept per rolling history (168 = one week of hourly samples).
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            history_capacity: default_history_capacity(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

fn default_history_capacity() -> usize {
    crate::models::HISTORY_CAPACITY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding API tokens and the optional `static/index.html`.
    pub dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path();
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Config file location: `CONFIG_FILE` or `config.toml`.
    pub fn path() -> String {
        std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into())
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the config back (admin edits to the network list).
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.validate()?;
        let s = toml::to_string_pretty(self)?;
        std::fs::write(path, s)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.api.url.is_empty(), "api.url must be non-empty");
        anyhow::ensure!(
            self.api.request_timeout_secs > 0,
            "api.request_timeout_secs must be > 0, got {}",
            self.api.request_timeout_secs
        );
        anyhow::ensure!(
            self.api.auth_timeout_secs > 0,
            "api.auth_timeout_secs must be > 0, got {}",
            self.api.auth_timeout_secs
        );
        anyhow::ensure!(
            self.polling.interval_secs > 0,
            "polling.interval_secs must be > 0, got {}",
            self.polling.interval_secs
        );
        anyhow::ensure!(
            self.polling.history_capacity > 0,
            "polling.history_capacity must be > 0, got {}",
            self.polling.history_capacity
        );
        anyhow::ensure!(!self.storage.dir.is_empty(), "storage.dir must be non-empty");
        anyhow::ensure!(
            self.networks.len() <= MAX_NETWORKS,
            "networks: at most {} networks allowed, got {}",
            MAX_NETWORKS,
            self.networks.len()
        );
        let mut seen = HashSet::new();
        for network in &self.networks {
            anyhow::ensure!(
                is_valid_network_id(&network.id),
                "networks: id must be numeric, got {:?}",
                network.id
            );
            anyhow::ensure!(
                seen.insert(network.id.as_str()),
                "networks: duplicate id {}",
                network.id
            );
        }
        Ok(())
    }
}

pub fn is_valid_network_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}
