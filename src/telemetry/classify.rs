// Per-device classification: OS family, frequency band, signal strength.
// Pure functions; malformed input yields the documented defaults instead of an error.

use serde_json::Value;

use crate::models::{Band, ConnectionType, OsFamily, RawDevice, SignalQuality, value_text};

/// Which text an OS rule searches.
#[derive(Debug, Clone, Copy)]
enum Haystack {
    /// Lower-cased manufacturer only.
    Manufacturer,
    /// Lower-cased "{manufacturer} {hostname}".
    Combined,
}

struct OsRule {
    family: OsFamily,
    haystack: Haystack,
    tokens: &'static [&'static str],
}

/// Evaluated top to bottom; first hit wins. Amazon goes first because its
/// devices often carry generic strings that would match other families.
const OS_RULES: &[OsRule] = &[
    OsRule {
        family: OsFamily::Amazon,
        haystack: Haystack::Manufacturer,
        tokens: &["amazon", "amazon technologies"],
    },
    OsRule {
        family: OsFamily::Amazon,
        haystack: Haystack::Combined,
        tokens: &["echo", "alexa", "fire tv", "kindle"],
    },
    OsRule {
        family: OsFamily::Ios,
        haystack: Haystack::Manufacturer,
        tokens: &["apple", "apple inc"],
    },
    OsRule {
        family: OsFamily::Ios,
        haystack: Haystack::Combined,
        tokens: &["iphone", "ipad", "mac", "ios", "apple"],
    },
    OsRule {
        family: OsFamily::Android,
        haystack: Haystack::Manufacturer,
        tokens: &[
            "samsung",
            "google",
            "lg electronics",
            "htc",
            "sony",
            "motorola",
            "huawei",
            "xiaomi",
            "oneplus",
        ],
    },
    OsRule {
        family: OsFamily::Android,
        haystack: Haystack::Combined,
        tokens: &["android", "pixel", "galaxy"],
    },
    OsRule {
        family: OsFamily::Windows,
        haystack: Haystack::Manufacturer,
        tokens: &["microsoft", "dell", "hp", "lenovo", "asus", "acer", "msi"],
    },
    OsRule {
        family: OsFamily::Windows,
        haystack: Haystack::Combined,
        tokens: &["windows", "microsoft", "surface"],
    },
    OsRule {
        family: OsFamily::Gaming,
        haystack: Haystack::Manufacturer,
        tokens: &["sony computer entertainment", "nintendo"],
    },
    OsRule {
        family: OsFamily::Gaming,
        haystack: Haystack::Combined,
        tokens: &["playstation", "xbox", "nintendo", "steam deck"],
    },
    OsRule {
        family: OsFamily::Streaming,
        haystack: Haystack::Manufacturer,
        tokens: &["roku", "nvidia", "chromecast"],
    },
    OsRule {
        family: OsFamily::Streaming,
        haystack: Haystack::Combined,
        tokens: &["roku", "chromecast", "nvidia shield", "apple tv"],
    },
];

/// Readings outside this range are labelled but not averaged.
const SAMPLE_RANGE_DBM: std::ops::RangeInclusive<f64> = -100.0..=-10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalReading {
    /// Parsed dBm; `None` for wired devices and unparseable values.
    pub dbm: Option<f64>,
    pub percent: u8,
    pub quality: SignalQuality,
}

impl SignalReading {
    pub fn wired() -> Self {
        Self {
            dbm: None,
            percent: 100,
            quality: SignalQuality::Wired,
        }
    }

    /// The reading as an average-able sample, if it is a plausible RSSI.
    pub fn sample(&self) -> Option<f64> {
        self.dbm.filter(|d| SAMPLE_RANGE_DBM.contains(d))
    }

    pub fn display(&self) -> String {
        match self.dbm {
            Some(dbm) => format!("{} dBm", dbm),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub os_family: OsFamily,
    pub connection: ConnectionType,
    pub frequency_display: String,
    pub band: Band,
    pub signal: SignalReading,
}

pub fn classify(device: &RawDevice) -> Classification {
    let os_family = detect_os(
        device.manufacturer.as_deref().unwrap_or_default(),
        device.hostname.as_deref().unwrap_or_default(),
    );
    if !device.wireless {
        return Classification {
            os_family,
            connection: ConnectionType::Wired,
            frequency_display: "Wired".to_string(),
            band: Band::Wired,
            signal: SignalReading::wired(),
        };
    }
    let iface = device.interface.as_ref();
    let (frequency_display, band) = parse_frequency(iface.and_then(|i| i.frequency.as_ref()));
    let signal = read_signal(iface.and_then(|i| i.signal_dbm.as_ref()));
    Classification {
        os_family,
        connection: ConnectionType::Wireless,
        frequency_display,
        band,
        signal,
    }
}

pub fn detect_os(manufacturer: &str, hostname: &str) -> OsFamily {
    let manufacturer = manufacturer.to_lowercase();
    let combined = format!("{} {}", manufacturer, hostname.to_lowercase());
    OS_RULES
        .iter()
        .find(|rule| {
            let text = match rule.haystack {
                Haystack::Manufacturer => &manufacturer,
                Haystack::Combined => &combined,
            };
            rule.tokens.iter().any(|t| text.contains(t))
        })
        .map(|rule| rule.family)
        .unwrap_or(OsFamily::Other)
}

/// Returns the display text and band for a raw wireless frequency (GHz).
pub fn parse_frequency(raw: Option<&Value>) -> (String, Band) {
    let unknown = || ("N/A".to_string(), Band::Unknown);
    let Some(raw) = raw else {
        return unknown();
    };
    let text = value_text(raw);
    let Some(ghz) = parse_number(raw) else {
        return unknown();
    };
    (format!("{} GHz", text), band_for_ghz(ghz))
}

pub fn band_for_ghz(ghz: f64) -> Band {
    if (2.4..2.5).contains(&ghz) {
        Band::Ghz2_4
    } else if (5.0..6.0).contains(&ghz) {
        Band::Ghz5
    } else if (6.0..7.0).contains(&ghz) {
        Band::Ghz6
    } else {
        Band::Unknown
    }
}

pub fn read_signal(raw: Option<&Value>) -> SignalReading {
    match raw.and_then(parse_dbm) {
        Some(dbm) => SignalReading {
            dbm: Some(dbm),
            percent: signal_percent(dbm),
            quality: signal_quality(dbm),
        },
        None => SignalReading {
            dbm: None,
            percent: 0,
            quality: SignalQuality::Unknown,
        },
    }
}

/// -50 dBm and above is 100%, -100 dBm and below is 0%, linear in between.
pub fn signal_percent(dbm: f64) -> u8 {
    if dbm >= -50.0 {
        100
    } else if dbm <= -100.0 {
        0
    } else {
        (2.0 * (dbm + 100.0)) as u8
    }
}

pub fn signal_quality(dbm: f64) -> SignalQuality {
    if dbm >= -50.0 {
        SignalQuality::Excellent
    } else if dbm >= -60.0 {
        SignalQuality::VeryGood
    } else if dbm >= -70.0 {
        SignalQuality::Good
    } else if dbm >= -80.0 {
        SignalQuality::Fair
    } else {
        SignalQuality::Poor
    }
}

/// Accepts numbers and strings like "-61", "-61 dBm" or "-61dBm".
fn parse_dbm(raw: &Value) -> Option<f64> {
    match raw {
        Value::String(s) => {
            let stripped = s.replace(" dBm", "").replace("dBm", "");
            finite(stripped.trim().parse().ok()?)
        }
        other => parse_number(other),
    }
}

fn parse_number(raw: &Value) -> Option<f64> {
    let n = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    finite(n)
}

fn finite(n: f64) -> Option<f64> {
    n.is_finite().then_some(n)
}
