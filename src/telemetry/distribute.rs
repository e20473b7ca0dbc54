// Theoretical capacity distribution.
// When some wireless devices could not be placed, every band's observed total is spread
// across the known APs by a hardware-class weight. This is an estimate layered on top
// of confirmed assignments, not a measurement.

use tracing::{debug, info};

use super::registry::ApRegistry;
use crate::models::{Band, BandCounts, DistributionOutcome};

/// Model markers, highest capacity first; first case-insensitive substring hit wins.
const MODEL_WEIGHTS: [(&str, f64); 6] = [
    ("max 7", 3.0),
    ("pro 7", 2.5),
    ("pro 6e", 2.2),
    ("pro 6", 2.0),
    ("beacon", 1.0),
    ("cupcake", 0.8),
];
const DEFAULT_MODEL_WEIGHT: f64 = 1.5;

const BUSY_LOCATIONS: [&str; 4] = ["main", "central", "lobby", "office"];
const BUSY_FACTOR: f64 = 1.2;
const QUIET_LOCATIONS: [&str; 3] = ["bedroom", "closet", "storage"];
const QUIET_FACTOR: f64 = 0.8;

pub fn model_weight(model: &str) -> f64 {
    let model = model.to_lowercase();
    MODEL_WEIGHTS
        .iter()
        .find(|(marker, _)| model.contains(marker))
        .map(|(_, w)| *w)
        .unwrap_or(DEFAULT_MODEL_WEIGHT)
}

pub fn location_factor(location: &str) -> f64 {
    let location = location.to_lowercase();
    if BUSY_LOCATIONS.iter().any(|k| location.contains(k)) {
        BUSY_FACTOR
    } else if QUIET_LOCATIONS.iter().any(|k| location.contains(k)) {
        QUIET_FACTOR
    } else {
        1.0
    }
}

pub fn capacity_weight(model: &str, location: &str) -> f64 {
    model_weight(model) * location_factor(location)
}

/// Splits `total` proportionally to `weights`, truncating every share except the
/// last, which takes the remainder. The shares always sum to `total`.
/// `None` when the weights cannot be used (empty, negative, non-finite, zero sum).
pub fn split_band(total: u32, weights: &[f64]) -> Option<Vec<u32>> {
    if weights.is_empty() || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return None;
    }
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return None;
    }
    let last = weights.len() - 1;
    let mut shares = Vec::with_capacity(weights.len());
    let mut distributed = 0u32;
    for (i, w) in weights.iter().enumerate() {
        let remaining = total - distributed;
        let share = if i == last {
            remaining
        } else {
            (((w / total_weight) * f64::from(total)) as u32).min(remaining)
        };
        shares.push(share);
        distributed += share;
    }
    Some(shares)
}

/// Adds estimated counts to every AP in `registry`, band by band, from the observed
/// wireless totals. Skipped when there is nowhere to distribute or nothing unassigned.
pub fn distribute(
    registry: &mut ApRegistry,
    observed: &BandCounts,
    unassigned: usize,
) -> DistributionOutcome {
    if registry.is_empty() {
        debug!("no access points known; capacity distribution skipped");
        return DistributionOutcome::NoAccessPoints;
    }
    if unassigned == 0 {
        debug!("all wireless devices assigned; capacity distribution skipped");
        return DistributionOutcome::NothingUnassigned;
    }

    let weights: Vec<f64> = registry
        .iter()
        .map(|ap| capacity_weight(&ap.model, &ap.location))
        .collect();
    let mut estimated = 0u32;
    for band in Band::WIRELESS {
        let band_total = observed.get(band);
        if band_total == 0 {
            continue;
        }
        let Some(shares) = split_band(band_total, &weights) else {
            debug!(band = band.as_str(), "unusable capacity weights; band skipped");
            continue;
        };
        for (ap, share) in registry.iter_mut().zip(shares) {
            if ap.record_estimated(band, share) {
                estimated += share;
            }
        }
    }

    info!(
        unassigned,
        access_points = registry.len(),
        estimated,
        "theoretical capacity distribution applied"
    );
    DistributionOutcome::Distributed {
        unassigned,
        estimated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EeroLocation, RawEero};
    use crate::telemetry::registry::build_registry;

    fn registry(aps: &[(&str, &str)]) -> ApRegistry {
        let records: Vec<RawEero> = aps
            .iter()
            .enumerate()
            .map(|(i, (model, location))| RawEero {
                url: Some(format!("/2.2/eeros/{}", i)),
                model: Some(model.to_string()),
                location: Some(EeroLocation::Text(location.to_string())),
                ..Default::default()
            })
            .collect();
        build_registry(&records)
    }

    #[test]
    fn model_weights_follow_marker_order() {
        assert_eq!(model_weight("eero Max 7"), 3.0);
        assert_eq!(model_weight("eero Pro 7"), 2.5);
        assert_eq!(model_weight("eero Pro 6E"), 2.2);
        assert_eq!(model_weight("eero Pro 6"), 2.0);
        assert_eq!(model_weight("eero Beacon"), 1.0);
        assert_eq!(model_weight("cupcake"), 0.8);
        assert_eq!(model_weight("eero 6+"), 1.5);
    }

    #[test]
    fn location_adjusts_weight() {
        assert!((capacity_weight("eero Pro 6", "Main Floor") - 2.4).abs() < 1e-9);
        assert!((capacity_weight("eero Pro 6", "Guest Bedroom") - 1.6).abs() < 1e-9);
        assert_eq!(capacity_weight("eero Pro 6", "Garage"), 2.0);
    }

    #[test]
    fn split_is_exact_for_awkward_weights() {
        let weight_sets: [&[f64]; 4] = [
            &[1.0, 1.0, 1.0],
            &[3.0, 0.64, 2.2, 1.8],
            &[0.8],
            &[2.5, 0.0, 1.2],
        ];
        for weights in weight_sets {
            for total in [1u32, 2, 7, 10, 97, 1000] {
                let shares = split_band(total, weights).unwrap();
                assert_eq!(shares.len(), weights.len());
                assert_eq!(shares.iter().sum::<u32>(), total, "weights={weights:?}");
            }
        }
    }

    #[test]
    fn last_share_takes_the_remainder() {
        assert_eq!(split_band(10, &[1.0, 1.0, 1.0]), Some(vec![3, 3, 4]));
    }

    #[test]
    fn zero_weight_sum_is_rejected() {
        assert_eq!(split_band(5, &[0.0, 0.0]), None);
        assert_eq!(split_band(5, &[]), None);
        assert_eq!(split_band(5, &[f64::NAN, 1.0]), None);
    }

    #[test]
    fn skipped_without_access_points_or_unassigned_devices() {
        let observed = BandCounts {
            ghz2_4: 1,
            ghz5: 1,
            ghz6: 0,
        };
        let mut empty = ApRegistry::default();
        assert_eq!(
            distribute(&mut empty, &observed, 2),
            DistributionOutcome::NoAccessPoints
        );
        let mut reg = registry(&[("eero Pro 6", "")]);
        assert_eq!(
            distribute(&mut reg, &observed, 0),
            DistributionOutcome::NothingUnassigned
        );
        assert_eq!(reg.iter().next().unwrap().total_devices, 0);
    }

    #[test]
    fn distributes_every_band_exactly_on_top_of_confirmed() {
        let mut reg = registry(&[("eero Max 7", "Office"), ("eero Beacon", "Bedroom")]);
        reg.get_mut("/2.2/eeros/0")
            .unwrap()
            .record_confirmed(Band::Ghz5);
        let observed = BandCounts {
            ghz2_4: 4,
            ghz5: 9,
            ghz6: 0,
        };
        let outcome = distribute(&mut reg, &observed, 3);
        assert_eq!(
            outcome,
            DistributionOutcome::Distributed {
                unassigned: 3,
                estimated: 13
            }
        );
        let estimated: BandCounts = reg.iter().fold(BandCounts::default(), |mut acc, ap| {
            acc.merge(&ap.estimated_by_freq);
            acc
        });
        assert_eq!(estimated, observed);
        let max = reg.get("/2.2/eeros/0").unwrap();
        // 3.6 / (3.6 + 0.8) of 9 -> 7, plus the confirmed device
        assert_eq!(max.devices_by_freq.ghz5, 8);
        assert_eq!(max.confirmed_devices, 1);
        assert_eq!(max.devices_by_freq.ghz6, 0);
    }
}
