// Polling cycle: fetch every pollable network, rebuild its snapshot, fold the combined view.
// Sole writer of the snapshots; readers get Arc clones of the latest complete values.

mod combined;
mod network;

pub use combined::CombinedFold;
pub use network::{NetworkSummary, assemble, average_dbm, summarize};

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::eero_client::NetworkClient;
use crate::models::{AccessPoint, CombinedSnapshot, NetworkSnapshot};
use crate::networks::{MonitoredNetwork, NetworkDirectory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub timestamp: String,
    /// Active and authenticated networks attempted this cycle.
    pub attempted: usize,
    pub processed: Vec<String>,
    pub skipped: Vec<String>,
    pub total_devices: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// Another cycle held the lock; nothing was done.
    AlreadyRunning,
}

pub struct Aggregator {
    client: Arc<dyn NetworkClient>,
    directory: Arc<dyn NetworkDirectory>,
    history_capacity: usize,
    cycle_lock: Mutex<()>,
    networks: RwLock<HashMap<String, Arc<NetworkSnapshot>>>,
    combined: RwLock<Arc<CombinedSnapshot>>,
}

impl Aggregator {
    pub fn new(
        client: Arc<dyn NetworkClient>,
        directory: Arc<dyn NetworkDirectory>,
        history_capacity: usize,
    ) -> Self {
        Self {
            client,
            directory,
            history_capacity,
            cycle_lock: Mutex::new(()),
            networks: RwLock::new(HashMap::new()),
            combined: RwLock::new(Arc::new(CombinedSnapshot::empty(history_capacity))),
        }
    }

    /// Runs one cycle unless one is already in flight, in which case this is a no-op.
    pub async fn trigger_cycle(&self) -> CycleOutcome {
        let Ok(_guard) = self.cycle_lock.try_lock() else {
            debug!("cycle already running; trigger dropped");
            return CycleOutcome::AlreadyRunning;
        };
        CycleOutcome::Completed(self.run_cycle().await)
    }

    pub async fn combined_snapshot(&self) -> Arc<CombinedSnapshot> {
        self.combined.read().await.clone()
    }

    pub async fn network_snapshot(&self, network_id: &str) -> Option<Arc<NetworkSnapshot>> {
        self.networks.read().await.get(network_id).cloned()
    }

    /// AP map of the network's latest snapshot; empty when it has none.
    pub async fn ap_data(&self, network_id: &str) -> BTreeMap<String, AccessPoint> {
        self.network_snapshot(network_id)
            .await
            .map(|s| s.ap_data.clone())
            .unwrap_or_default()
    }

    pub async fn network_snapshots(&self) -> HashMap<String, Arc<NetworkSnapshot>> {
        self.networks.read().await.clone()
    }

    #[tracing::instrument(name = "cycle", skip(self))]
    async fn run_cycle(&self) -> CycleReport {
        let timestamp = now_timestamp();
        let monitored = self.directory.monitored_networks();
        self.forget_unlisted(&monitored).await;

        let pollable: Vec<&MonitoredNetwork> =
            monitored.iter().filter(|n| n.is_pollable()).collect();
        for n in monitored.iter().filter(|n| n.active && !n.authenticated) {
            debug!(network_id = %n.id, "network not authenticated; skipped");
        }

        let mut fold = CombinedFold::default();
        let mut processed = Vec::new();
        let mut skipped = Vec::new();
        for network in &pollable {
            match self.poll_network(network).await {
                Some(summary) => {
                    fold.absorb(&summary);
                    self.publish_network(network, summary, &timestamp).await;
                    processed.push(network.id.clone());
                }
                None => skipped.push(network.id.clone()),
            }
        }

        let previous = self.combined_snapshot().await;
        let combined = fold.finish(&previous, &timestamp, pollable.len());
        let total_devices = combined.total_devices;
        *self.combined.write().await = Arc::new(combined);

        info!(
            attempted = pollable.len(),
            processed = processed.len(),
            skipped = skipped.len(),
            total_devices,
            "cycle complete"
        );
        CycleReport {
            timestamp,
            attempted: pollable.len(),
            processed,
            skipped,
            total_devices,
        }
    }

    /// `None` means skip this network this cycle; its previous snapshot stays.
    async fn poll_network(&self, network: &MonitoredNetwork) -> Option<NetworkSummary> {
        let devices = match self.client.fetch_devices(&network.id).await {
            Ok(devices) => devices,
            Err(e) => {
                warn!(network_id = %network.id, operation = "fetch_devices", error = %e, "fetch failed");
                Vec::new()
            }
        };
        if devices.is_empty() {
            warn!(network_id = %network.id, "no devices returned; keeping last snapshot");
            return None;
        }
        let eeros = match self.client.fetch_topology(&network.id).await {
            Ok(eeros) => eeros,
            Err(e) => {
                warn!(network_id = %network.id, operation = "fetch_topology", error = %e, "fetch failed");
                Vec::new()
            }
        };
        Some(summarize(network, &devices, &eeros))
    }

    async fn publish_network(&self, network: &MonitoredNetwork, summary: NetworkSummary, timestamp: &str) {
        let mut networks = self.networks.write().await;
        let previous = networks.get(&network.id).cloned();
        let snapshot = assemble(
            network,
            summary,
            previous.as_deref(),
            timestamp,
            self.history_capacity,
        );
        info!(
            network_id = %network.id,
            devices = snapshot.total_devices,
            wireless = snapshot.wireless_devices,
            unassigned = snapshot.unassigned_devices,
            "network snapshot updated"
        );
        networks.insert(network.id.clone(), Arc::new(snapshot));
    }

    /// Snapshots of networks that were removed from the list are dropped.
    async fn forget_unlisted(&self, monitored: &[MonitoredNetwork]) {
        let mut networks = self.networks.write().await;
        networks.retain(|id, _| monitored.iter().any(|n| &n.id == id));
    }
}

fn now_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
