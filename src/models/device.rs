// Derived device view: classification labels plus identity, as served to the dashboard.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operating-system family guessed from manufacturer and hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OsFamily {
    #[serde(rename = "iOS")]
    Ios,
    Android,
    Windows,
    Amazon,
    Gaming,
    Streaming,
    Other,
}

impl OsFamily {
    pub const ALL: [OsFamily; 7] = [
        OsFamily::Ios,
        OsFamily::Android,
        OsFamily::Windows,
        OsFamily::Amazon,
        OsFamily::Gaming,
        OsFamily::Streaming,
        OsFamily::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Ios => "iOS",
            OsFamily::Android => "Android",
            OsFamily::Windows => "Windows",
            OsFamily::Amazon => "Amazon",
            OsFamily::Gaming => "Gaming",
            OsFamily::Streaming => "Streaming",
            OsFamily::Other => "Other",
        }
    }
}

/// OS-family histogram; every family is present, zero or not.
pub type OsCounts = BTreeMap<OsFamily, u32>;

pub fn empty_os_counts() -> OsCounts {
    OsFamily::ALL.iter().map(|f| (*f, 0)).collect()
}

/// Frequency band bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    Ghz5,
    #[serde(rename = "6GHz")]
    Ghz6,
    Wired,
    Unknown,
}

impl Band {
    /// Bands that are counted in histograms and per-AP tallies.
    pub const WIRELESS: [Band; 3] = [Band::Ghz2_4, Band::Ghz5, Band::Ghz6];

    pub fn as_str(self) -> &'static str {
        match self {
            Band::Ghz2_4 => "2.4GHz",
            Band::Ghz5 => "5GHz",
            Band::Ghz6 => "6GHz",
            Band::Wired => "Wired",
            Band::Unknown => "Unknown",
        }
    }
}

/// Device counts for the three wireless bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    #[serde(rename = "2.4GHz")]
    pub ghz2_4: u32,
    #[serde(rename = "5GHz")]
    pub ghz5: u32,
    #[serde(rename = "6GHz")]
    pub ghz6: u32,
}

impl BandCounts {
    pub fn get(&self, band: Band) -> u32 {
        match band {
            Band::Ghz2_4 => self.ghz2_4,
            Band::Ghz5 => self.ghz5,
            Band::Ghz6 => self.ghz6,
            Band::Wired | Band::Unknown => 0,
        }
    }

    /// Adds `n` to the band's counter. Returns false for bands that are not tallied.
    pub fn add(&mut self, band: Band, n: u32) -> bool {
        let slot = match band {
            Band::Ghz2_4 => &mut self.ghz2_4,
            Band::Ghz5 => &mut self.ghz5,
            Band::Ghz6 => &mut self.ghz6,
            Band::Wired | Band::Unknown => return false,
        };
        *slot += n;
        true
    }

    pub fn merge(&mut self, other: &BandCounts) {
        self.ghz2_4 += other.ghz2_4;
        self.ghz5 += other.ghz5;
        self.ghz6 += other.ghz6;
    }

    pub fn total(&self) -> u32 {
        self.ghz2_4 + self.ghz5 + self.ghz6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalQuality {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Poor,
    Unknown,
    Wired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionType {
    Wireless,
    Wired,
}

/// One connected device as shown in the dashboard tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub ip: String,
    pub mac: String,
    pub manufacturer: String,
    pub device_os: OsFamily,
    pub connection_type: ConnectionType,
    pub frequency: String,
    pub frequency_band: Band,
    pub signal_avg_dbm: String,
    pub signal_avg: u8,
    pub signal_quality: SignalQuality,
    /// AP id the resolver matched this cycle; absent when unassigned or wired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_point: Option<String>,
    pub network_id: String,
    pub network_name: String,
}
