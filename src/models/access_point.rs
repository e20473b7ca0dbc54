// Access point (eero) entry: identity plus per-cycle device tallies.

use serde::{Deserialize, Serialize};

use super::{Band, BandCounts};

/// One eero that provides wireless service, rebuilt every cycle with zeroed counters.
///
/// `devices_by_freq` / `total_devices` are what the dashboard charts: confirmed
/// assignments plus the theoretical capacity estimate. The split is kept in
/// `confirmed_*` and `estimated_*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPoint {
    pub id: String,
    pub name: String,
    pub model: String,
    pub serial: String,
    pub location: String,
    /// Trailing id from the eero URL, used for insight deep links.
    pub numeric_id: String,
    pub devices_by_freq: BandCounts,
    pub total_devices: u32,
    pub confirmed_by_freq: BandCounts,
    pub confirmed_devices: u32,
    pub estimated_by_freq: BandCounts,
    pub estimated_devices: u32,
}

impl AccessPoint {
    pub fn new(
        id: String,
        name: String,
        model: String,
        serial: String,
        location: String,
        numeric_id: String,
    ) -> Self {
        Self {
            id,
            name,
            model,
            serial,
            location,
            numeric_id,
            devices_by_freq: BandCounts::default(),
            total_devices: 0,
            confirmed_by_freq: BandCounts::default(),
            confirmed_devices: 0,
            estimated_by_freq: BandCounts::default(),
            estimated_devices: 0,
        }
    }

    /// Counts one device the resolver matched. False when the band is not tallied.
    pub fn record_confirmed(&mut self, band: Band) -> bool {
        if !self.confirmed_by_freq.add(band, 1) {
            return false;
        }
        self.confirmed_devices += 1;
        self.devices_by_freq.add(band, 1);
        self.total_devices += 1;
        true
    }

    /// Adds a theoretical share on top of confirmed assignments.
    pub fn record_estimated(&mut self, band: Band, n: u32) -> bool {
        if n == 0 || !self.estimated_by_freq.add(band, n) {
            return false;
        }
        self.estimated_devices += n;
        self.devices_by_freq.add(band, n);
        self.total_devices += n;
        true
    }
}
