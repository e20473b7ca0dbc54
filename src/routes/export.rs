// CSV export of per-network totals

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use csv::Writer;
use std::collections::HashMap;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::models::{Band, NetworkSnapshot, OsFamily};
use crate::networks::MonitoredNetwork;

const INSIGHT_URL: &str = "https://insight.eero.com/networks";

/// GET /api/export/csv
pub(super) async fn csv_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snapshots = state.aggregator.network_snapshots().await;
    let body = export_networks_csv(&state.networks.list(), &snapshots)?;
    let filename = format!(
        "eero_network_export_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// One row per configured network; networks without data export zeros.
pub fn export_networks_csv(
    networks: &[MonitoredNetwork],
    snapshots: &HashMap<String, Arc<NetworkSnapshot>>,
) -> anyhow::Result<String> {
    let mut writer = Writer::from_writer(vec![]);

    let mut header = vec![
        "Network Name".to_string(),
        "Network ID".to_string(),
        "Authenticated".to_string(),
        "Active".to_string(),
        "Total Devices".to_string(),
        "Wireless Devices".to_string(),
        "Wired Devices".to_string(),
    ];
    header.extend(OsFamily::ALL.iter().map(|f| format!("{} Devices", f.as_str())));
    header.extend(Band::WIRELESS.iter().map(|b| format!("{} Devices", b.as_str())));
    header.push("Last Update".to_string());
    header.push("Insight Link".to_string());
    writer.write_record(&header)?;

    for network in networks {
        let snapshot = snapshots.get(&network.id);
        let mut row = vec![
            network.name.clone(),
            network.id.clone(),
            yes_no(network.authenticated).to_string(),
            yes_no(network.active).to_string(),
        ];
        match snapshot {
            Some(s) => {
                row.push(s.total_devices.to_string());
                row.push(s.wireless_devices.to_string());
                row.push(s.wired_devices.to_string());
                row.extend(
                    OsFamily::ALL
                        .iter()
                        .map(|f| s.device_os.get(f).copied().unwrap_or(0).to_string()),
                );
                row.extend(
                    Band::WIRELESS
                        .iter()
                        .map(|b| s.frequency_distribution.get(*b).to_string()),
                );
                row.push(s.last_successful_update.clone());
            }
            None => {
                let zeros = 3 + OsFamily::ALL.len() + Band::WIRELESS.len();
                row.extend(std::iter::repeat_n("0".to_string(), zeros));
                row.push(String::new());
            }
        }
        row.push(format!("{}/{}", INSIGHT_URL, network.id));
        writer.write_record(&row)?;
    }

    let csv_data = String::from_utf8(writer.into_inner()?)?;
    Ok(csv_data)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
