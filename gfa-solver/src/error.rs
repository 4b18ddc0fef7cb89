use gfa_core::models::{IntervalError, NetworkId, RegionId};
use std::time::Duration;

/// How the caller should react to a failed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Disposition {
    /// The interval may succeed if run again later, e.g. once ingestion catches up
    Retryable,
    /// The interval will fail again with the same inputs; it needs attention
    Fatal,
}

/// Every way a stage of the pipeline can fail.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The reader returned no usable rows where some are required
    #[error("no {0} data for the interval")]
    NoInputData(&'static str),

    /// A row references a region outside the network's region set
    #[error("{kind} row references unknown region {region}")]
    UnknownRegion {
        /// Which kind of row carried the region
        kind: &'static str,
        /// The offending region
        region: RegionId,
    },

    /// The requested network is not configured
    #[error("network {0} is not configured")]
    UnknownNetwork(NetworkId),

    /// A row or request is structurally invalid
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Total imports and exports of a quantity disagree
    #[error("{quantity} imports {imports} do not match exports {exports}")]
    ConservationViolation {
        /// Which quantity failed the check
        quantity: &'static str,
        /// Sum of the imports over all regions
        imports: f64,
        /// Sum of the exports over all regions
        exports: f64,
    },

    /// The solver failed to produce an allocation
    #[error(transparent)]
    Solver(#[from] SolveError),

    /// The reader returned an error
    #[error("failed to load {what}")]
    ReaderFailure {
        /// Which load failed
        what: &'static str,
        /// The reader's error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The sink returned an error
    #[error("failed to persist the aggregates")]
    PersistenceFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The sink reported writing a different number of records than submitted
    #[error("sink wrote {written} of {expected} records")]
    PartialWrite {
        /// Records the sink reported
        written: usize,
        /// Records submitted
        expected: usize,
    },

    /// A reader or sink call did not complete in time
    #[error("{operation} call timed out after {after:?}")]
    Timeout {
        /// The operation that stalled
        operation: &'static str,
        /// The configured bound
        after: Duration,
    },
}

impl FlowError {
    /// Classify this error as retryable or fatal.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::NoInputData(_)
            | Self::ReaderFailure { .. }
            | Self::PersistenceFailure(_)
            | Self::PartialWrite { .. }
            | Self::Timeout { .. } => Disposition::Retryable,
            Self::UnknownRegion { .. }
            | Self::UnknownNetwork(_)
            | Self::MalformedInput(_)
            | Self::ConservationViolation { .. }
            | Self::Solver(_) => Disposition::Fatal,
        }
    }
}

impl From<IntervalError> for FlowError {
    fn from(value: IntervalError) -> Self {
        Self::MalformedInput(value.to_string())
    }
}

/// Failures of the allocation strategies.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// The intensity system could not be solved, which only overflowing
    /// flows or generation can cause
    #[error("intensity system is singular at region {region}")]
    Singular {
        /// The region whose balance could not be solved
        region: RegionId,
    },
}

