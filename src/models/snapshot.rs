// Aggregated per-network and combined views, plus the bounded rolling histories.

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, VecDeque};

use super::{AccessPoint, BandCounts, DeviceInfo, OsCounts, empty_os_counts};

/// One week of hourly samples.
pub const HISTORY_CAPACITY: usize = 168;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountSample {
    pub timestamp: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSample {
    pub timestamp: String,
    pub avg_dbm: f64,
}

/// FIFO buffer capped at `cap` entries; the oldest insertion is evicted first.
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingHistory<T> {
    samples: VecDeque<T>,
    cap: usize,
}

impl<T> RollingHistory<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(cap.min(HISTORY_CAPACITY)),
            cap,
        }
    }

    pub fn push(&mut self, sample: T) {
        self.samples.push_back(sample);
        while self.samples.len() > self.cap {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.samples.front()
    }

    pub fn last(&self) -> Option<&T> {
        self.samples.back()
    }
}

impl<T> Default for RollingHistory<T> {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl<T: Serialize> Serialize for RollingHistory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.samples.serialize(serializer)
    }
}

/// What the capacity distributor did for a network this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DistributionOutcome {
    /// Theoretical capacity distribution was applied on top of confirmed counts.
    Distributed { unassigned: usize, estimated: u32 },
    NoAccessPoints,
    NothingUnassigned,
}

/// Latest aggregated state of one monitored network.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSnapshot {
    pub network_id: String,
    pub network_name: String,
    pub devices: Vec<DeviceInfo>,
    pub device_os: OsCounts,
    pub frequency_distribution: BandCounts,
    pub ap_data: BTreeMap<String, AccessPoint>,
    pub total_devices: usize,
    pub wireless_devices: usize,
    pub wired_devices: usize,
    pub assigned_devices: usize,
    pub unassigned_devices: usize,
    pub distribution: DistributionOutcome,
    pub connected_users: RollingHistory<CountSample>,
    pub signal_strength_avg: RollingHistory<SignalSample>,
    pub last_update: String,
    pub last_successful_update: String,
}

/// All processed networks folded together. Histories carry over between cycles;
/// everything else is recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedSnapshot {
    pub devices: Vec<DeviceInfo>,
    pub device_os: OsCounts,
    pub frequency_distribution: BandCounts,
    pub total_devices: usize,
    pub wireless_devices: usize,
    pub wired_devices: usize,
    pub connected_users: RollingHistory<CountSample>,
    pub signal_strength_avg: RollingHistory<SignalSample>,
    pub last_update: Option<String>,
    pub last_successful_update: Option<String>,
    pub active_networks: usize,
}

impl CombinedSnapshot {
    pub fn empty(history_capacity: usize) -> Self {
        Self {
            devices: Vec::new(),
            device_os: empty_os_counts(),
            frequency_distribution: BandCounts::default(),
            total_devices: 0,
            wireless_devices: 0,
            wired_devices: 0,
            connected_users: RollingHistory::new(history_capacity),
            signal_strength_avg: RollingHistory::new(history_capacity),
            last_update: None,
            last_successful_update: None,
            active_networks: 0,
        }
    }
}
