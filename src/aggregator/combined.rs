// Fold of every network processed in a cycle into the combined view.

use super::network::{NetworkSummary, record_samples};
use crate::models::{BandCounts, CombinedSnapshot, DeviceInfo, OsCounts, empty_os_counts};

#[derive(Debug)]
pub struct CombinedFold {
    devices: Vec<DeviceInfo>,
    device_os: OsCounts,
    frequency_distribution: BandCounts,
    wireless_devices: usize,
    wired_devices: usize,
    signal_samples: Vec<f64>,
    networks: usize,
}

impl Default for CombinedFold {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            device_os: empty_os_counts(),
            frequency_distribution: BandCounts::default(),
            wireless_devices: 0,
            wired_devices: 0,
            signal_samples: Vec::new(),
            networks: 0,
        }
    }
}

impl CombinedFold {
    pub fn absorb(&mut self, summary: &NetworkSummary) {
        self.devices.extend(summary.devices.iter().cloned());
        for (family, n) in &summary.device_os {
            *self.device_os.entry(*family).or_insert(0) += n;
        }
        self.frequency_distribution
            .merge(&summary.frequency_distribution);
        self.wireless_devices += summary.wireless_devices;
        self.wired_devices += summary.wired_devices;
        self.signal_samples.extend_from_slice(&summary.signal_samples);
        self.networks += 1;
    }

    /// Networks absorbed so far.
    pub fn networks(&self) -> usize {
        self.networks
    }

    /// Recomputes every field from this cycle's networks; histories continue from `previous`.
    /// `last_update` always moves; `last_successful_update` only when a network was absorbed.
    pub fn finish(
        self,
        previous: &CombinedSnapshot,
        timestamp: &str,
        active_networks: usize,
    ) -> CombinedSnapshot {
        let mut connected_users = previous.connected_users.clone();
        let mut signal_strength_avg = previous.signal_strength_avg.clone();
        record_samples(
            &mut connected_users,
            &mut signal_strength_avg,
            timestamp,
            self.devices.len(),
            &self.signal_samples,
        );
        let last_successful_update = if self.networks > 0 {
            Some(timestamp.to_string())
        } else {
            previous.last_successful_update.clone()
        };
        CombinedSnapshot {
            total_devices: self.devices.len(),
            devices: self.devices,
            device_os: self.device_os,
            frequency_distribution: self.frequency_distribution,
            wireless_devices: self.wireless_devices,
            wired_devices: self.wired_devices,
            connected_users,
            signal_strength_avg,
            last_update: Some(timestamp.to_string()),
            last_successful_update,
            active_networks,
        }
    }
}
