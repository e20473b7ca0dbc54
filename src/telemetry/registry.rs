// Access point registry built from eero topology records.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::models::{AccessPoint, RawEero, non_empty};

/// Models containing this (case-insensitive) are gateways with no wireless service.
pub const GATEWAY_MARKER: &str = "gateway";
const EERO_PATH_MARKER: &str = "/eeros/";

/// Known APs in topology order, plus a BSSID lookup.
#[derive(Debug, Clone, Default)]
pub struct ApRegistry {
    aps: Vec<AccessPoint>,
    index: HashMap<String, usize>,
    bssids: HashMap<String, String>,
}

impl ApRegistry {
    pub fn get(&self, id: &str) -> Option<&AccessPoint> {
        self.index.get(id).map(|&i| &self.aps[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut AccessPoint> {
        self.index.get(id).map(|&i| &mut self.aps[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// AP id for a lower-cased BSSID.
    pub fn ap_for_bssid(&self, bssid: &str) -> Option<&str> {
        self.bssids.get(bssid).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessPoint> {
        self.aps.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AccessPoint> {
        self.aps.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.aps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aps.is_empty()
    }

    pub fn bssid_count(&self) -> usize {
        self.bssids.len()
    }

    pub fn into_map(self) -> BTreeMap<String, AccessPoint> {
        self.aps.into_iter().map(|ap| (ap.id.clone(), ap)).collect()
    }

    /// A later AP with the same id replaces the earlier one in place.
    fn insert(&mut self, ap: AccessPoint) {
        match self.index.get(&ap.id) {
            Some(&i) => {
                debug!(ap_id = %ap.id, "duplicate AP id; later record wins");
                self.aps[i] = ap;
            }
            None => {
                self.index.insert(ap.id.clone(), self.aps.len());
                self.aps.push(ap);
            }
        }
    }
}

/// Builds the registry for one cycle. Gateways are skipped; counters start at zero.
pub fn build_registry(records: &[RawEero]) -> ApRegistry {
    let mut registry = ApRegistry::default();
    for eero in records {
        let model = non_empty(eero.model.as_deref()).unwrap_or("Unknown");
        if is_gateway(model) {
            info!(model, "skipping gateway device");
            continue;
        }
        let location = eero
            .location
            .as_ref()
            .and_then(|l| l.name())
            .unwrap_or_default();
        let serial = eero.serial.as_deref().unwrap_or_default();
        let name = display_name(model, eero.nickname.as_deref(), location, serial);
        let id = non_empty(eero.url.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());

        for bssid in &eero.bssids_with_bands {
            let Some(addr) = non_empty(bssid.ethernet_address.as_deref()) else {
                continue;
            };
            if let Some(prev) = registry.bssids.insert(addr.to_lowercase(), id.clone())
                && prev != id
            {
                debug!(bssid = addr, previous = %prev, ap_id = %id, "BSSID reassigned");
            }
        }

        let numeric = numeric_id(&id);
        registry.insert(AccessPoint::new(
            id,
            name,
            model.to_string(),
            serial.to_string(),
            location.to_string(),
            numeric,
        ));
    }
    registry
}

pub fn is_gateway(model: &str) -> bool {
    model.to_lowercase().contains(GATEWAY_MARKER)
}

/// Nickname, else "{model} ({location})", else "{model} (...{serial tail})", else model.
pub fn display_name(model: &str, nickname: Option<&str>, location: &str, serial: &str) -> String {
    if let Some(nick) = nickname.map(str::trim).filter(|n| !n.is_empty()) {
        return nick.to_string();
    }
    if !location.is_empty() {
        return format!("{} ({})", model, location);
    }
    if !serial.is_empty() {
        let skip = serial.chars().count().saturating_sub(4);
        let tail: String = serial.chars().skip(skip).collect();
        return format!("{} (...{})", model, tail);
    }
    model.to_string()
}

/// "/2.2/eeros/38576632" -> "38576632"; ids without the marker are returned as is.
pub fn numeric_id(id: &str) -> String {
    match id.rfind(EERO_PATH_MARKER) {
        Some(pos) => id[pos + EERO_PATH_MARKER.len()..].to_string(),
        None => id.to_string(),
    }
}
