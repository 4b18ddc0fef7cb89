use super::{Interval, IntervalError, NetworkId, RegionId};
use std::time::Duration;
use time::OffsetDateTime;

/// The static description of a network the engine runs against.
///
/// This is supplied by configuration, never discovered from telemetry: the
/// region set is what a reading is validated against, and `interconnectors`
/// decides whether an interval with no flow rows is a data gap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// The network code
    pub code: NetworkId,

    /// Every region of the network
    pub regions: Vec<RegionId>,

    /// Whether the network has interconnectors between its regions
    #[cfg_attr(feature = "serde", serde(default))]
    pub interconnectors: bool,

    /// The length of a trading interval
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_interval", with = "humantime_serde")
    )]
    pub interval: Duration,
}

#[cfg(feature = "serde")]
fn default_interval() -> Duration {
    Duration::from_secs(300)
}

impl NetworkConfig {
    /// Whether `region` belongs to this network
    pub fn contains(&self, region: &RegionId) -> bool {
        self.regions.contains(region)
    }

    /// The interval of this network starting at `start`
    pub fn interval_at(&self, start: OffsetDateTime) -> Result<Interval, IntervalError> {
        Interval::aligned(start, self.interval)
    }
}
