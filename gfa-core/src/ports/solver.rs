use crate::models::{FlowAllocation, Map, NettedFlow, RegionEnergyEmissions, RegionId};

/// Everything a solver may look at for one interval of one network.
#[derive(Debug, Clone, Copy)]
pub struct SolverInput<'a> {
    /// Generation totals of every region that generated, sorted by region
    pub generation: &'a Map<RegionId, RegionEnergyEmissions>,

    /// Price per MWh of every priced region
    pub prices: &'a Map<RegionId, f64>,

    /// Netted flows, sorted by (region_from, region_to)
    pub flows: &'a [NettedFlow],
}

/// Interface for strategies that allocate emissions and market value onto
/// netted interconnector flows.
///
/// Emissions and value are only known where energy is generated. A solver
/// decides how much of each travels with the energy on every interconnector,
/// producing one leg per netted flow and the accumulation of those legs per
/// region.
///
/// Solvers are pure: they perform no I/O, and identical inputs must produce
/// bit-identical outputs.
pub trait FlowSolver {
    /// Error type for solver failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// A short, stable name for logs and summaries
    fn name(&self) -> &'static str;

    /// Allocate emissions and value onto the flows of `input`.
    ///
    /// A region whose intensity or price cannot be determined must still be
    /// allocated (treating the missing figure as 0) and flagged as
    /// low-confidence.
    fn solve(&self, input: SolverInput<'_>) -> Result<FlowAllocation, Self::Error>;
}
