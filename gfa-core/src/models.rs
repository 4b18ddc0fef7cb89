mod allocation;
mod flow;
mod ids;
mod interval;
mod map;
mod network;
mod region;
mod telemetry;

pub use allocation::{
    FlowAllocation, FlowAllocationResult, FlowLeg, MAX_PRECISION, RegionAllocation,
};
pub use flow::NettedFlow;
pub use ids::{FacilityCode, NetworkId, RegionId};
pub use interval::{Interval, IntervalError};
pub use map::Map;
pub use network::NetworkConfig;
pub use region::{RegionDemand, RegionEnergyEmissions, RegionImportExport};
pub use telemetry::{GenerationReading, InterconnectorFlow, RegionPrice};

/// Divide `numerator` by `denominator`, yielding 0 whenever the denominator is
/// not strictly positive.
///
/// Every ratio in the pipeline (emissions intensity, per-unit value) goes
/// through this function so that zero or negative energy never raises or
/// produces a NaN.
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
