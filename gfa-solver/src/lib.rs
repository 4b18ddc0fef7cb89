#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod config;
pub use config::{ConservationMode, FlowConfig};

mod error;
pub use error::{Disposition, FlowError, SolveError};

/**
 * These are the pure, in-memory stages of the pipeline.
 */
mod conservation;
mod demand;
mod merge;
mod netting;
mod telemetry;
pub use conservation::check_conservation;
pub use demand::{calculate_demand, region_import_export};
pub use merge::{Merged, merge};
pub use netting::net_flows;
pub use telemetry::{aggregate_generation, collect_prices};

/**
 * These are implementations of the allocation strategies.
 */
mod impls;
pub use impls::*;

mod orchestrator;
pub use orchestrator::{IntervalFailure, IntervalOrchestrator, Stage, Summary};

// We use non-std collections here for their ordering semantics and performance
pub(crate) type Set<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;
