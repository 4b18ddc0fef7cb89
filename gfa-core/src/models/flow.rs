use super::{Interval, RegionId};

/// The net energy moved between an ordered pair of regions.
///
/// After netting there is at most one `NettedFlow` per unordered pair of
/// regions for an interval, its energy is strictly positive, and the reverse
/// direction is implicitly zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NettedFlow {
    /// The interval of the flow
    pub interval: Interval,

    /// The exporting region
    pub region_from: RegionId,

    /// The importing region
    pub region_to: RegionId,

    /// The net energy moved, in MWh
    pub energy: f64,
}
