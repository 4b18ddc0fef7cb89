use crate::SolveError;
use gfa_core::{
    models::{FlowAllocation, FlowLeg},
    ports::{FlowSolver, SolverInput},
};

/// Allocates each netted flow at the generation intensity and price of the
/// region it leaves.
///
/// For a flow of energy `e` from `a` to `b`, the leg carries `e × intensity(a)`
/// emissions and `e × price(a)` market value. Each flow isolates a single link,
/// so a region exporting over several links simply accumulates its legs.
///
/// When the exporting region has no generation (undefined intensity) or no
/// price, the missing figure is taken as 0 and both ends of the leg are
/// flagged as low-confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalSolver;

impl FlowSolver for ProportionalSolver {
    type Error = SolveError;

    fn name(&self) -> &'static str {
        "proportional"
    }

    fn solve(&self, input: SolverInput<'_>) -> Result<FlowAllocation, Self::Error> {
        let SolverInput {
            generation,
            prices,
            flows,
        } = input;

        let mut allocation = FlowAllocation::default();
        for region in generation.keys() {
            allocation.include(region);
        }

        for flow in flows {
            let intensity = generation
                .get(&flow.region_from)
                .filter(|record| record.has_energy())
                .map(|record| record.emissions_intensity);
            let price = prices.get(&flow.region_from).copied();

            allocation.push(FlowLeg {
                region_from: flow.region_from.clone(),
                region_to: flow.region_to.clone(),
                energy: flow.energy,
                emissions: flow.energy * intensity.unwrap_or(0.0),
                market_value: flow.energy * price.unwrap_or(0.0),
            });

            if intensity.is_none() || price.is_none() {
                allocation.flag(&flow.region_from);
                allocation.flag(&flow.region_to);
            }
        }

        Ok(allocation.into_sorted())
    }
}
