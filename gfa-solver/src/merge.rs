use crate::Set;
use gfa_core::models::{
    FlowAllocation, FlowAllocationResult, Interval, Map, NetworkId, RegionDemand, RegionId,
};

/// The joined records of an interval, and the regions the join left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Merged {
    /// One record per region present on both sides, sorted by region
    pub records: Vec<FlowAllocationResult>,
    /// Regions present on only one side, sorted
    pub dropped: Vec<RegionId>,
}

/// Inner-join the solver's allocation with the regional totals.
///
/// A region must have both a demand record (so, generation telemetry) and an
/// allocation to produce a record. Anything else is incomplete: it is not
/// null-filled, only reported in `dropped` so the caller can retry it later.
pub fn merge(
    interval: &Interval,
    network: &NetworkId,
    demand: &Map<RegionId, RegionDemand>,
    allocation: &FlowAllocation,
) -> Merged {
    let mut dropped = Set::default();
    let mut records = Vec::with_capacity(demand.len());

    for (region, allocated) in allocation.regions.iter() {
        let Some(totals) = demand.get(region) else {
            dropped.insert(region.clone());
            continue;
        };

        records.push(FlowAllocationResult {
            interval: *interval,
            network: network.clone(),
            region: region.clone(),
            energy_imports: totals.flows.energy_imports,
            energy_exports: totals.flows.energy_exports,
            emissions_imports: allocated.emissions_imports,
            emissions_exports: allocated.emissions_exports,
            market_value_imports: allocated.market_value_imports,
            market_value_exports: allocated.market_value_exports,
            low_confidence: allocated.low_confidence,
        });
    }

    for region in demand.keys() {
        if !allocation.regions.contains_key(region) {
            dropped.insert(region.clone());
        }
    }

    records.sort_unstable_by(|a, b| a.region.cmp(&b.region));
    dropped.sort_unstable();

    Merged {
        records,
        dropped: dropped.into_iter().collect(),
    }
}
