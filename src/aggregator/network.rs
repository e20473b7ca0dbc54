// One network's cycle: raw telemetry -> classified devices, AP tallies and histories.

use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{
    AccessPoint, BandCounts, ConnectionType, CountSample, DeviceInfo, DistributionOutcome,
    NetworkSnapshot, OsCounts, RawDevice, RawEero, RollingHistory, SignalSample, empty_os_counts,
};
use crate::networks::MonitoredNetwork;
use crate::telemetry::{Classification, build_registry, classify, distribute, resolve};

/// Everything computed from one fetch, before histories are attached.
#[derive(Debug, Clone)]
pub struct NetworkSummary {
    pub devices: Vec<DeviceInfo>,
    pub device_os: OsCounts,
    pub frequency_distribution: BandCounts,
    pub ap_data: BTreeMap<String, AccessPoint>,
    pub wireless_devices: usize,
    pub wired_devices: usize,
    pub assigned_devices: usize,
    pub unassigned_devices: usize,
    pub distribution: DistributionOutcome,
    /// In-range dBm readings, kept raw so the combined average weighs every device.
    pub signal_samples: Vec<f64>,
}

impl NetworkSummary {
    pub fn total_devices(&self) -> usize {
        self.devices.len()
    }
}

/// Runs the telemetry pipeline over the connected devices of one network.
pub fn summarize(network: &MonitoredNetwork, devices: &[RawDevice], eeros: &[RawEero]) -> NetworkSummary {
    let mut registry = build_registry(eeros);
    let mut device_os = empty_os_counts();
    let mut frequency_distribution = BandCounts::default();
    let mut signal_samples = Vec::new();
    let mut infos = Vec::new();
    let (mut wireless, mut assigned, mut unassigned) = (0usize, 0usize, 0usize);

    for device in devices.iter().filter(|d| d.connected) {
        let class = classify(device);
        *device_os.entry(class.os_family).or_insert(0) += 1;

        let mut access_point = None;
        if class.connection == ConnectionType::Wireless {
            wireless += 1;
            frequency_distribution.add(class.band, 1);
            signal_samples.extend(class.signal.sample());
            match resolve(device, class.band, &mut registry) {
                Some(assignment) => {
                    assigned += 1;
                    access_point = Some(assignment.ap_id);
                }
                None => unassigned += 1,
            }
        }
        infos.push(device_info(device, &class, access_point, network));
    }

    let distribution = distribute(&mut registry, &frequency_distribution, unassigned);
    debug!(
        network_id = %network.id,
        devices = infos.len(),
        wireless,
        assigned,
        unassigned,
        access_points = registry.len(),
        "network summarized"
    );

    NetworkSummary {
        wired_devices: infos.len() - wireless,
        devices: infos,
        device_os,
        frequency_distribution,
        ap_data: registry.into_map(),
        wireless_devices: wireless,
        assigned_devices: assigned,
        unassigned_devices: unassigned,
        distribution,
        signal_samples,
    }
}

fn device_info(
    device: &RawDevice,
    class: &Classification,
    access_point: Option<String>,
    network: &MonitoredNetwork,
) -> DeviceInfo {
    let ip = if device.ips.is_empty() {
        "N/A".to_string()
    } else {
        device.ips.join(", ")
    };
    DeviceInfo {
        name: device.display_name().to_string(),
        ip,
        mac: device.mac.clone().unwrap_or_else(|| "N/A".into()),
        manufacturer: device
            .manufacturer
            .clone()
            .unwrap_or_else(|| "Unknown".into()),
        device_os: class.os_family,
        connection_type: class.connection,
        frequency: class.frequency_display.clone(),
        frequency_band: class.band,
        signal_avg_dbm: class.signal.display(),
        signal_avg: class.signal.percent,
        signal_quality: class.signal.quality,
        access_point,
        network_id: network.id.clone(),
        network_name: network.name.clone(),
    }
}

/// Mean of the readings rounded to 0.1 dBm; `None` when there were none.
pub fn average_dbm(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Appends this cycle's samples to the histories.
pub fn record_samples(
    connected_users: &mut RollingHistory<CountSample>,
    signal_strength_avg: &mut RollingHistory<SignalSample>,
    timestamp: &str,
    count: usize,
    signal_samples: &[f64],
) {
    connected_users.push(CountSample {
        timestamp: timestamp.to_string(),
        count,
    });
    if let Some(avg_dbm) = average_dbm(signal_samples) {
        signal_strength_avg.push(SignalSample {
            timestamp: timestamp.to_string(),
            avg_dbm,
        });
    }
}

/// Builds the new snapshot, carrying the histories of `previous` forward.
pub fn assemble(
    network: &MonitoredNetwork,
    summary: NetworkSummary,
    previous: Option<&NetworkSnapshot>,
    timestamp: &str,
    history_capacity: usize,
) -> NetworkSnapshot {
    let (mut connected_users, mut signal_strength_avg) = match previous {
        Some(prev) => (prev.connected_users.clone(), prev.signal_strength_avg.clone()),
        None => (
            RollingHistory::new(history_capacity),
            RollingHistory::new(history_capacity),
        ),
    };
    record_samples(
        &mut connected_users,
        &mut signal_strength_avg,
        timestamp,
        summary.total_devices(),
        &summary.signal_samples,
    );

    NetworkSnapshot {
        network_id: network.id.clone(),
        network_name: network.name.clone(),
        total_devices: summary.total_devices(),
        wireless_devices: summary.wireless_devices,
        wired_devices: summary.wired_devices,
        assigned_devices: summary.assigned_devices,
        unassigned_devices: summary.unassigned_devices,
        distribution: summary.distribution,
        devices: summary.devices,
        device_os: summary.device_os,
        frequency_distribution: summary.frequency_distribution,
        ap_data: summary.ap_data,
        connected_users,
        signal_strength_avg,
        last_update: timestamp.to_string(),
        last_successful_update: timestamp.to_string(),
    }
}
