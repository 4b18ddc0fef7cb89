use crate::{Set, SolveError};
use gfa_core::{
    models::{FlowAllocation, FlowLeg, RegionId, ratio},
    ports::{FlowSolver, SolverInput},
};

/// Allocates each netted flow at the intensity of the energy mix leaving the
/// exporting region, following emissions through intermediate regions.
///
/// A region that imports and re-exports energy passes on a blend of its own
/// generation and what it received. The outgoing intensity of every region
/// solves
///
/// ```text
/// c[r] = (emissions[r] + Σ f[k→r]·c[k]) / (energy[r] + Σ f[k→r])
/// ```
///
/// which we solve directly by elimination over the regions in canonical
/// order. Regions that no generating region feeds carry intensity 0, which
/// leaves a system with a unique solution however much energy circulates
/// around a loop.
///
/// Market value is not blended: each leg is valued at the exporting region's
/// own price.
///
/// A region without generation of its own, or without a price, is flagged
/// as low-confidence at both ends of its legs, as with the proportional
/// strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSolver;

impl FlowSolver for TracingSolver {
    type Error = SolveError;

    fn name(&self) -> &'static str {
        "tracing"
    }

    fn solve(&self, input: SolverInput<'_>) -> Result<FlowAllocation, Self::Error> {
        let SolverInput {
            generation,
            prices,
            flows,
        } = input;

        // Assign a canonical index to every region we will touch
        let mut regions = {
            let mut all = generation
                .keys()
                .chain(flows.iter().flat_map(|f| [&f.region_from, &f.region_to]))
                .collect::<Vec<&RegionId>>();
            all.sort_unstable();
            all.dedup();
            all.into_iter().collect::<Set<&RegionId>>()
        };

        // The edges of the flow graph, stored against the exporting region
        let mut outflows = vec![Vec::new(); regions.len()];
        let mut edges = Vec::with_capacity(flows.len());
        for flow in flows {
            let (from, _) = regions.insert_full(&flow.region_from);
            let (to, _) = regions.insert_full(&flow.region_to);
            outflows[from].push((to, flow.energy));
            edges.push(from);
        }

        let own = regions
            .iter()
            .map(|region| {
                generation
                    .get(*region)
                    .map(|record| (record.emissions, record.energy))
                    .unwrap_or((0.0, 0.0))
            })
            .collect::<Vec<_>>();

        let fed = fed_by_generation(&own, &outflows);

        // c[r]·(energy[r] + Σ f[k→r]) − Σ f[k→r]·c[k] = emissions[r]
        let n = regions.len();
        let mut matrix = vec![vec![0.0; n]; n];
        let mut rhs = vec![0.0; n];
        for r in 0..n {
            if fed[r] {
                matrix[r][r] += own[r].1;
                rhs[r] = own[r].0;
            } else {
                matrix[r][r] = 1.0;
            }
        }
        for (k, targets) in outflows.iter().enumerate() {
            for &(r, energy) in targets {
                if fed[r] {
                    matrix[r][r] += energy;
                    matrix[r][k] -= energy;
                }
            }
        }

        let intensity = eliminate(matrix, rhs).map_err(|r| SolveError::Singular {
            region: regions[r].clone(),
        })?;

        let mut allocation = FlowAllocation::default();
        for region in generation.keys() {
            allocation.include(region);
        }

        for (flow, from) in flows.iter().zip(edges) {
            let generated = generation
                .get(&flow.region_from)
                .is_some_and(|record| record.has_energy());
            let price = prices.get(&flow.region_from).copied();

            allocation.push(FlowLeg {
                region_from: flow.region_from.clone(),
                region_to: flow.region_to.clone(),
                energy: flow.energy,
                emissions: flow.energy * intensity[from],
                market_value: flow.energy * price.unwrap_or(0.0),
            });

            if !generated || price.is_none() {
                allocation.flag(&flow.region_from);
                allocation.flag(&flow.region_to);
            }
        }

        Ok(allocation.into_sorted())
    }
}

/// Marks every region reachable along the flows from a region with generation.
fn fed_by_generation(own: &[(f64, f64)], outflows: &[Vec<(usize, f64)>]) -> Vec<bool> {
    let mut fed = own.iter().map(|&(_, energy)| energy > 0.0).collect::<Vec<_>>();
    let mut stack = (0..fed.len()).filter(|&r| fed[r]).collect::<Vec<_>>();
    while let Some(k) = stack.pop() {
        for &(r, _) in &outflows[k] {
            if !fed[r] {
                fed[r] = true;
                stack.push(r);
            }
        }
    }
    fed
}

/// Solves `matrix · x = rhs` by Gaussian elimination in index order.
///
/// The matrix is weakly chained diagonally dominant with a positive
/// diagonal, so no pivoting is needed and every pivot stays positive. A
/// pivot that is not a positive finite number can only come from overflowing
/// inputs, and is returned as the offending index.
fn eliminate(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>, usize> {
    let n = rhs.len();
    for j in 0..n {
        let pivot = matrix[j][j];
        if !(pivot.is_finite() && pivot > 0.0) {
            return Err(j);
        }
        for i in j + 1..n {
            let factor = matrix[i][j] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in j..n {
                matrix[i][k] -= factor * matrix[j][k];
            }
            rhs[i] -= factor * rhs[j];
        }
    }

    let mut x = vec![0.0; n];
    for j in (0..n).rev() {
        let tail = (j + 1..n).map(|k| matrix[j][k] * x[k]).sum::<f64>();
        x[j] = ratio(rhs[j] - tail, matrix[j][j]);
    }
    Ok(x)
}
