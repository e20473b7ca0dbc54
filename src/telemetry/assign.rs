// Wireless device -> access point matching.
// Heuristics run in a fixed order and the first hit wins; a miss is a normal outcome.

use serde::Serialize;

use super::registry::ApRegistry;
use crate::models::{Band, RawDevice, RawInterface, non_empty, value_text};

/// Interface fields that sometimes carry the parent AP's MAC, probed in this order.
pub const SECONDARY_AP_FIELDS: [&str; 4] = ["ap_mac", "access_point", "connected_eero", "parent_eero"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMethod {
    SourceHint,
    DirectReference,
    Bssid,
    SecondaryField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub ap_id: String,
    pub method: AssignmentMethod,
}

type Heuristic = for<'a> fn(&RawDevice, &'a ApRegistry) -> Option<&'a str>;

const HEURISTICS: [(AssignmentMethod, Heuristic); 4] = [
    (AssignmentMethod::SourceHint, by_source_hint),
    (AssignmentMethod::DirectReference, by_direct_reference),
    (AssignmentMethod::Bssid, by_bssid),
    (AssignmentMethod::SecondaryField, by_secondary_field),
];

/// Finds the AP a device is associated with, if any heuristic can tell.
/// Deterministic for a given device and registry.
pub fn assign(device: &RawDevice, registry: &ApRegistry) -> Option<Assignment> {
    HEURISTICS.iter().find_map(|(method, heuristic)| {
        heuristic(device, registry).map(|ap_id| Assignment {
            ap_id: ap_id.to_string(),
            method: *method,
        })
    })
}

/// Assigns and counts the device on its AP. Returns `None` when no heuristic
/// matched or the band is not tallied; either way the device is unassigned.
pub fn resolve(device: &RawDevice, band: Band, registry: &mut ApRegistry) -> Option<Assignment> {
    let assignment = assign(device, registry)?;
    let ap = registry.get_mut(&assignment.ap_id)?;
    ap.record_confirmed(band).then_some(assignment)
}

/// Source location as a substring of an AP name, or source URL equal to an AP id.
fn by_source_hint<'a>(device: &RawDevice, registry: &'a ApRegistry) -> Option<&'a str> {
    let source = device.source.as_ref()?;
    let location = non_empty(source.location.as_deref()).map(str::to_lowercase);
    let url = non_empty(source.url.as_deref());
    if location.is_none() && url.is_none() {
        return None;
    }
    registry
        .iter()
        .find(|ap| {
            let by_location = location
                .as_deref()
                .is_some_and(|loc| ap.name.to_lowercase().contains(loc));
            by_location || url.is_some_and(|u| u == ap.id)
        })
        .map(|ap| ap.id.as_str())
}

/// `eero_url` (or `eero`) naming a registered AP.
fn by_direct_reference<'a>(device: &RawDevice, registry: &'a ApRegistry) -> Option<&'a str> {
    let iface = interface(device)?;
    let reference =
        non_empty(iface.eero_url.as_deref()).or_else(|| non_empty(iface.eero.as_deref()))?;
    registry.get(reference).map(|ap| ap.id.as_str())
}

fn by_bssid<'a>(device: &RawDevice, registry: &'a ApRegistry) -> Option<&'a str> {
    let bssid = non_empty(interface(device)?.bssid.as_deref())?;
    registry.ap_for_bssid(&bssid.to_lowercase())
}

fn by_secondary_field<'a>(device: &RawDevice, registry: &'a ApRegistry) -> Option<&'a str> {
    let iface = interface(device)?;
    SECONDARY_AP_FIELDS.iter().find_map(|field| {
        let value = iface.extra.get(*field)?;
        registry.ap_for_bssid(&value_text(value).to_lowercase())
    })
}

fn interface(device: &RawDevice) -> Option<&RawInterface> {
    device.interface.as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawBssid, RawEero, RawSource};
    use crate::telemetry::registry::build_registry;
    use serde_json::json;

    fn registry() -> ApRegistry {
        let eero = |url: &str, model: &str, location: &str, bssid: &str| RawEero {
            url: Some(url.into()),
            model: Some(model.into()),
            location: Some(crate::models::EeroLocation::Text(location.into())),
            bssids_with_bands: vec![RawBssid {
                ethernet_address: Some(bssid.into()),
                band: Some("band_5GHz".into()),
            }],
            ..Default::default()
        };
        build_registry(&[
            eero("/2.2/eeros/1", "eero Pro 6", "Office", "AA:AA:AA:AA:AA:01"),
            eero("/2.2/eeros/2", "eero Beacon", "Bedroom", "AA:AA:AA:AA:AA:02"),
            eero("/2.2/eeros/3", "eero Gateway", "Closet", "AA:AA:AA:AA:AA:03"),
        ])
    }

    fn device(interface: serde_json::Value) -> RawDevice {
        serde_json::from_value(json!({
            "connected": true,
            "wireless": true,
            "interface": interface,
        }))
        .unwrap()
    }

    #[test]
    fn source_location_matches_ap_name() {
        let mut d = device(json!({ "bssid": "aa:aa:aa:aa:aa:01" }));
        d.source = Some(RawSource {
            location: Some("bedroom".into()),
            url: None,
        });
        let a = assign(&d, &registry()).unwrap();
        assert_eq!(a.ap_id, "/2.2/eeros/2");
        assert_eq!(a.method, AssignmentMethod::SourceHint);
    }

    #[test]
    fn source_url_matches_ap_id() {
        let mut d = device(json!({}));
        d.source = Some(RawSource {
            location: Some("Garage".into()),
            url: Some("/2.2/eeros/1".into()),
        });
        assert_eq!(assign(&d, &registry()).unwrap().ap_id, "/2.2/eeros/1");
    }

    #[test]
    fn direct_reference_requires_known_ap() {
        let d = device(json!({ "eero_url": "/2.2/eeros/2" }));
        let a = assign(&d, &registry()).unwrap();
        assert_eq!(a.method, AssignmentMethod::DirectReference);

        let unknown = device(json!({ "eero": "/2.2/eeros/3" }));
        assert_eq!(assign(&unknown, &registry()), None);
    }

    #[test]
    fn bssid_lookup_is_case_insensitive() {
        let d = device(json!({ "bssid": "AA:AA:AA:AA:AA:01" }));
        let a = assign(&d, &registry()).unwrap();
        assert_eq!(a.ap_id, "/2.2/eeros/1");
        assert_eq!(a.method, AssignmentMethod::Bssid);
    }

    #[test]
    fn secondary_fields_are_probed_in_order() {
        let d = device(json!({
            "access_point": "zz:zz",
            "parent_eero": "AA:AA:AA:AA:AA:02",
        }));
        let a = assign(&d, &registry()).unwrap();
        assert_eq!(a.ap_id, "/2.2/eeros/2");
        assert_eq!(a.method, AssignmentMethod::SecondaryField);
    }

    #[test]
    fn gateway_bssid_never_assigns() {
        let d = device(json!({ "bssid": "aa:aa:aa:aa:aa:03" }));
        assert_eq!(assign(&d, &registry()), None);
    }

    #[test]
    fn assignment_is_deterministic() {
        let d = device(json!({ "bssid": "aa:aa:aa:aa:aa:02", "ap_mac": "aa:aa:aa:aa:aa:01" }));
        let reg = registry();
        assert_eq!(assign(&d, &reg), assign(&d, &reg));
    }

    #[test]
    fn resolve_counts_on_the_ap_but_not_unknown_bands() {
        let mut reg = registry();
        let d = device(json!({ "bssid": "aa:aa:aa:aa:aa:01" }));
        assert!(resolve(&d, Band::Ghz5, &mut reg).is_some());
        assert!(resolve(&d, Band::Unknown, &mut reg).is_none());
        let ap = reg.get("/2.2/eeros/1").unwrap();
        assert_eq!(ap.confirmed_devices, 1);
        assert_eq!(ap.confirmed_by_freq.ghz5, 1);
        assert_eq!(ap.total_devices, 1);
    }
}
