// Monitored network list: config entries joined with token state, plus admin edits.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::config::{AppConfig, MAX_NETWORKS, NetworkConfig, is_valid_network_id};
use crate::token_store::TokenStore;

const MAX_NAME_LEN: usize = 50;

/// A configured network as the aggregator and the dashboard see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoredNetwork {
    pub id: String,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub authenticated: bool,
}

impl MonitoredNetwork {
    pub fn is_pollable(&self) -> bool {
        self.active && self.authenticated
    }
}

/// Where the aggregator learns which networks exist each cycle.
pub trait NetworkDirectory: Send + Sync {
    fn monitored_networks(&self) -> Vec<MonitoredNetwork>;
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Network ID must be numeric")]
    InvalidId,
    #[error("Valid email address required")]
    InvalidEmail,
    #[error("Network {0} already exists")]
    AlreadyExists(String),
    #[error("Maximum {} networks allowed", MAX_NETWORKS)]
    LimitReached,
    #[error("Network {0} not found")]
    NotFound(String),
    #[error("Network name cannot be empty")]
    EmptyName,
    #[error("Network name must be {} characters or less", MAX_NAME_LEN)]
    NameTooLong,
    #[error("Failed to save configuration: {0}")]
    Persist(#[source] anyhow::Error),
}

/// Owns the live network list. Edits are written back to the config file when one is set.
pub struct NetworkManager {
    config_path: Option<PathBuf>,
    config: RwLock<AppConfig>,
    edit_lock: tokio::sync::Mutex<()>,
    tokens: Arc<TokenStore>,
}

impl NetworkManager {
    pub fn new(config: AppConfig, config_path: Option<PathBuf>, tokens: Arc<TokenStore>) -> Self {
        Self {
            config_path,
            config: RwLock::new(config),
            edit_lock: tokio::sync::Mutex::new(()),
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn list(&self) -> Vec<MonitoredNetwork> {
        self.read()
            .networks
            .iter()
            .map(|n| self.monitored(n))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<MonitoredNetwork> {
        self.read()
            .networks
            .iter()
            .find(|n| n.id == id)
            .map(|n| self.monitored(n))
    }

    pub async fn add(
        &self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<MonitoredNetwork, AdminError> {
        let id = id.trim();
        let email = email.trim();
        if !is_valid_network_id(id) {
            return Err(AdminError::InvalidId);
        }
        if !email.contains('@') {
            return Err(AdminError::InvalidEmail);
        }
        let name = match name.trim() {
            "" => format!("Network {}", id),
            n => n.to_string(),
        };
        check_name(&name)?;

        let _edit = self.edit_lock.lock().await;
        let mut next = self.read().clone();
        if next.networks.iter().any(|n| n.id == id) {
            return Err(AdminError::AlreadyExists(id.to_string()));
        }
        if next.networks.len() >= MAX_NETWORKS {
            return Err(AdminError::LimitReached);
        }
        let entry = NetworkConfig {
            id: id.to_string(),
            name,
            email: email.to_string(),
            active: true,
        };
        next.networks.push(entry.clone());
        self.commit(next).await?;
        info!(network_id = id, "network added");
        Ok(self.monitored(&entry))
    }

    /// Drops the network and any token stored for it.
    pub async fn remove(&self, id: &str) -> Result<(), AdminError> {
        let _edit = self.edit_lock.lock().await;
        let mut next = self.read().clone();
        let before = next.networks.len();
        next.networks.retain(|n| n.id != id);
        if next.networks.len() == before {
            return Err(AdminError::NotFound(id.to_string()));
        }
        self.commit(next).await?;
        if let Err(e) = self.tokens.remove(id) {
            tracing::warn!(network_id = id, error = %e, "failed to remove token files");
        }
        info!(network_id = id, "network removed");
        Ok(())
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<MonitoredNetwork, AdminError> {
        let name = name.trim();
        check_name(name)?;
        self.update(id, |n| n.name = name.to_string()).await
    }

    /// Flips the active flag; inactive networks are not polled.
    pub async fn toggle(&self, id: &str) -> Result<MonitoredNetwork, AdminError> {
        self.update(id, |n| n.active = !n.active).await
    }

    /// Remembers the login email used for the network.
    pub async fn set_email(&self, id: &str, email: &str) -> Result<MonitoredNetwork, AdminError> {
        if !email.contains('@') {
            return Err(AdminError::InvalidEmail);
        }
        self.update(id, |n| n.email = email.to_string()).await
    }

    async fn update(
        &self,
        id: &str,
        edit: impl FnOnce(&mut NetworkConfig),
    ) -> Result<MonitoredNetwork, AdminError> {
        let _edit = self.edit_lock.lock().await;
        let mut next = self.read().clone();
        let entry = next
            .networks
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AdminError::NotFound(id.to_string()))?;
        edit(entry);
        let updated = entry.clone();
        self.commit(next).await?;
        Ok(self.monitored(&updated))
    }

    /// Saves `next` and only then makes it the live list. Callers hold `edit_lock`.
    async fn commit(&self, next: AppConfig) -> Result<(), AdminError> {
        if let Some(path) = self.config_path.clone() {
            let snapshot = next.clone();
            tokio::task::spawn_blocking(move || snapshot.save(path))
                .await
                .map_err(|e| AdminError::Persist(e.into()))?
                .map_err(AdminError::Persist)?;
        }
        *self.write() = next;
        Ok(())
    }

    fn monitored(&self, n: &NetworkConfig) -> MonitoredNetwork {
        MonitoredNetwork {
            id: n.id.clone(),
            name: n.name.clone(),
            email: n.email.clone(),
            active: n.active,
            authenticated: self.tokens.is_authenticated(&n.id),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AppConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AppConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NetworkDirectory for NetworkManager {
    fn monitored_networks(&self) -> Vec<MonitoredNetwork> {
        self.list()
    }
}

fn check_name(name: &str) -> Result<(), AdminError> {
    if name.is_empty() {
        return Err(AdminError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AdminError::NameTooLong);
    }
    Ok(())
}
