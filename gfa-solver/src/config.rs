//! Engine configuration.
//!
//! The orchestrator receives one of these at construction; no stage reads
//! configuration from anywhere else.

use crate::SolverVersion;
use std::time::Duration;

/// What to do when total imports and exports disagree beyond the tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ConservationMode {
    /// Fail the interval (unless it carries low-confidence regions)
    #[default]
    Strict,
    /// Log a warning and persist anyway
    Lenient,
}

/// Configuration of the allocation engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FlowConfig {
    /// Relative tolerance of the conservation check
    pub tolerance: f64,

    /// Whether a conservation violation is fatal
    pub mode: ConservationMode,

    /// Decimal places kept when persisting
    pub precision: u32,

    /// Bound on each reader call
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub reader_timeout: Duration,

    /// Bound on the sink call
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub sink_timeout: Duration,

    /// Which allocation strategy to run
    pub solver: SolverVersion,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            mode: ConservationMode::Strict,
            precision: 6,
            reader_timeout: Duration::from_secs(30),
            sink_timeout: Duration::from_secs(30),
            solver: SolverVersion::default(),
        }
    }
}
