// Shared test helpers: canned eero responses and stub collaborators

#![allow(dead_code)]

use eero_dashboard::eero_client::{BoxFuture, ClientError, LoginClient, NetworkClient};
use eero_dashboard::models::{RawDevice, RawEero};
use eero_dashboard::networks::{MonitoredNetwork, NetworkDirectory};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

pub fn devices_fixture() -> Vec<RawDevice> {
    serde_json::from_value(json!([
        {
            "nickname": "Kitchen iPad",
            "manufacturer": "Apple, Inc.",
            "mac": "11:11:11:11:11:11",
            "ips": ["192.168.4.20"],
            "connected": true,
            "wireless": true,
            "interface": { "frequency": "5.18", "signal_dbm": "-52 dBm", "bssid": "AA:BB:CC:00:00:01" }
        },
        {
            "hostname": "galaxy-s23",
            "manufacturer": "Samsung Electronics",
            "connected": true,
            "wireless": true,
            "interface": { "frequency": 2.437, "signal_dbm": -68 }
        },
        {
            "hostname": "echo-dot",
            "manufacturer": "Amazon Technologies Inc.",
            "connected": true,
            "wireless": true,
            "source": { "location": "bedroom" },
            "interface": { "frequency": 2.412, "signal_dbm": "-75" }
        },
        {
            "hostname": "nas",
            "manufacturer": "Synology",
            "connected": true,
            "wireless": false
        },
        {
            "hostname": "old-laptop",
            "manufacturer": "Dell Inc.",
            "connected": false,
            "wireless": true
        }
    ]))
    .unwrap()
}

pub fn eeros_fixture() -> Vec<RawEero> {
    serde_json::from_value(json!([
        {
            "url": "/2.2/eeros/101",
            "model": "eero Max 7",
            "location": "Office",
            "serial": "GGC1234",
            "bssids_with_bands": [{ "ethernet_address": "aa:bb:cc:00:00:01", "band": "band_5GHz" }]
        },
        {
            "url": "/2.2/eeros/102",
            "model": "eero Beacon",
            "location": { "name": "Bedroom" }
        },
        { "url": "/2.2/eeros/103", "model": "eero Gateway" }
    ]))
    .unwrap()
}

pub fn network(id: &str) -> MonitoredNetwork {
    MonitoredNetwork {
        id: id.into(),
        name: format!("Network {}", id),
        email: String::new(),
        active: true,
        authenticated: true,
    }
}

/// Fixed network list.
pub struct StaticDirectory(pub Mutex<Vec<MonitoredNetwork>>);

impl StaticDirectory {
    pub fn new(networks: Vec<MonitoredNetwork>) -> Self {
        Self(Mutex::new(networks))
    }
}

impl NetworkDirectory for StaticDirectory {
    fn monitored_networks(&self) -> Vec<MonitoredNetwork> {
        self.0.lock().unwrap().clone()
    }
}

/// Canned responses per network id; ids in `failing` return an error from
/// fetch_devices, ids in `failing_topology` from fetch_topology.
/// With `gate` set, every fetch_devices call waits for a notification.
#[derive(Default)]
pub struct StubClient {
    pub devices: Mutex<HashMap<String, Vec<RawDevice>>>,
    pub eeros: Mutex<HashMap<String, Vec<RawEero>>>,
    pub failing: Mutex<Vec<String>>,
    pub failing_topology: Mutex<Vec<String>>,
    pub device_calls: AtomicUsize,
    pub gate: Option<(Notify, Notify)>,
}

impl StubClient {
    pub fn with_network(self, id: &str, devices: Vec<RawDevice>, eeros: Vec<RawEero>) -> Self {
        self.devices.lock().unwrap().insert(id.into(), devices);
        self.eeros.lock().unwrap().insert(id.into(), eeros);
        self
    }

    pub fn fail(&self, id: &str) {
        self.failing.lock().unwrap().push(id.into());
    }

    pub fn fail_topology(&self, id: &str) {
        self.failing_topology.lock().unwrap().push(id.into());
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some((Notify::new(), Notify::new()));
        self
    }

    /// Resolves once a gated fetch has started.
    pub async fn entered(&self) {
        if let Some((entered, _)) = &self.gate {
            entered.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some((_, release)) = &self.gate {
            release.notify_one();
        }
    }
}

impl NetworkClient for StubClient {
    fn fetch_devices<'a>(
        &'a self,
        network_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawDevice>, ClientError>> {
        Box::pin(async move {
            self.device_calls.fetch_add(1, Ordering::SeqCst);
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            if self.failing.lock().unwrap().iter().any(|f| f == network_id) {
                return Err(ClientError::Unexpected("stub failure".into()));
            }
            Ok(self
                .devices
                .lock()
                .unwrap()
                .get(network_id)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn fetch_topology<'a>(
        &'a self,
        network_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawEero>, ClientError>> {
        Box::pin(async move {
            if self.failing_topology.lock().unwrap().iter().any(|f| f == network_id) {
                return Err(ClientError::Unexpected("stub topology failure".into()));
            }
            Ok(self
                .eeros
                .lock()
                .unwrap()
                .get(network_id)
                .cloned()
                .unwrap_or_default())
        })
    }
}

/// Accepts code "123456" and issues token "pending-token".
pub struct StubLogin;

impl LoginClient for StubLogin {
    fn request_code<'a>(&'a self, _email: &'a str) -> BoxFuture<'a, Result<String, ClientError>> {
        Box::pin(async { Ok("pending-token".to_string()) })
    }

    fn verify_code<'a>(
        &'a self,
        token: &'a str,
        code: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            if token == "pending-token" && code == "123456" {
                Ok(())
            } else {
                Err(ClientError::Unexpected("invalid code".into()))
            }
        })
    }
}
