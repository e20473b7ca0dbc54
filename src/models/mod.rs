// Domain models: raw vendor records and the aggregated views built from them

mod access_point;
mod device;
mod raw;
mod snapshot;

pub use access_point::AccessPoint;
pub use device::{
    Band, BandCounts, ConnectionType, DeviceInfo, OsCounts, OsFamily, SignalQuality,
    empty_os_counts,
};
pub(crate) use raw::non_empty;
pub use raw::{EeroLocation, RawBssid, RawDevice, RawEero, RawInterface, RawSource, value_text};
pub use snapshot::{
    CombinedSnapshot, CountSample, DistributionOutcome, HISTORY_CAPACITY, NetworkSnapshot,
    RollingHistory, SignalSample,
};
