// Raw records as returned by the eero API (devices and eeros).
// Every field is optional or lenient: one odd record must not fail the whole list.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// A client device as listed by `GET /networks/{id}/devices`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDevice {
    #[serde(default, deserialize_with = "lenient")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hostname: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mac: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ips: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wireless: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub interface: Option<RawInterface>,
    /// Upstream hint about the eero the device is attached to.
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<RawSource>,
}

impl RawDevice {
    /// Nickname, then hostname, then a placeholder.
    pub fn display_name(&self) -> &str {
        non_empty(self.nickname.as_deref())
            .or_else(|| non_empty(self.hostname.as_deref()))
            .unwrap_or("Unknown Device")
    }
}

/// Wireless interface metadata. Values the vendor sends in several shapes
/// (number or "-52 dBm") are kept as raw JSON and parsed by the classifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInterface {
    #[serde(default)]
    pub frequency: Option<Value>,
    #[serde(default)]
    pub signal_dbm: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub bssid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub eero_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub eero: Option<String>,
    /// Remaining fields; secondary AP identifiers are looked up here.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// An eero unit as listed by `GET /networks/{id}/eeros`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEero {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub serial: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<EeroLocation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bssids_with_bands: Vec<RawBssid>,
}

/// Location arrives either as plain text or as `{ "name": "..." }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EeroLocation {
    Text(String),
    Named {
        #[serde(default)]
        name: Option<String>,
    },
}

impl EeroLocation {
    pub fn name(&self) -> Option<&str> {
        match self {
            EeroLocation::Text(s) => non_empty(Some(s)),
            EeroLocation::Named { name } => non_empty(name.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBssid {
    #[serde(default, deserialize_with = "lenient")]
    pub ethernet_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub band: Option<String>,
}

/// Text form of a loosely typed JSON value (strings unquoted).
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Deserializes to `None` instead of failing when the value has an unexpected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
