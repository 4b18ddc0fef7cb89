use crate::SolveError;
use gfa_core::{
    models::FlowAllocation,
    ports::{FlowSolver, SolverInput},
};

/// Allocation at the exporting region's own generation intensity
mod proportional;
pub use proportional::ProportionalSolver;

/// Allocation at the intensity of the energy mix leaving each region
mod traced;
pub use traced::TracingSolver;

/// The allocation strategies a deployment can select.
///
/// The selection is made once, from configuration, when the orchestrator is
/// built; the stages never branch on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SolverVersion {
    /// Flow tracing through intermediate regions
    V2,
    /// Proportional allocation per interconnector
    #[default]
    V3,
}

impl SolverVersion {
    /// Construct the selected strategy with its default settings
    pub fn solver(self) -> AnySolver {
        match self {
            Self::V2 => AnySolver::Tracing(TracingSolver),
            Self::V3 => AnySolver::Proportional(ProportionalSolver),
        }
    }
}

/// Any of the strategies, for when the choice is only known at runtime.
#[derive(Debug, Clone)]
pub enum AnySolver {
    /// See [`ProportionalSolver`]
    Proportional(ProportionalSolver),
    /// See [`TracingSolver`]
    Tracing(TracingSolver),
}

// Conveniently, we can use the same enum to handle the particulars of calling into
// the various solver implementations
impl FlowSolver for AnySolver {
    type Error = SolveError;

    fn name(&self) -> &'static str {
        match self {
            Self::Proportional(solver) => solver.name(),
            Self::Tracing(solver) => solver.name(),
        }
    }

    fn solve(&self, input: SolverInput<'_>) -> Result<FlowAllocation, Self::Error> {
        match self {
            Self::Proportional(solver) => solver.solve(input),
            Self::Tracing(solver) => solver.solve(input),
        }
    }
}
