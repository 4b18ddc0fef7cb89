//! Sequencing of the per-interval pipeline.
//!
//! An interval moves through `LOADING → NETTING → DEMAND → SOLVING → MERGING →
//! PERSISTING → DONE`, each stage consuming the full output of the previous
//! one. Any stage may fail, which ends the run with an [`IntervalFailure`]
//! naming the stage. The orchestrator never retries; the failure's
//! [`Disposition`] tells the caller whether a retry can help.

use crate::{
    ConservationMode, Disposition, FlowConfig, FlowError, Merged, aggregate_generation,
    calculate_demand, check_conservation, collect_prices, merge, net_flows, region_import_export,
};
use gfa_core::{
    models::{FlowAllocationResult, Interval, Map, NetworkConfig, NetworkId, RegionId},
    ports::{AggregateSink, FlowSolver, SolverInput, TimeSeriesReader},
};
use std::fmt::Display;
use time::OffsetDateTime;
use tokio::{time::timeout, try_join};
use tracing::{Instrument as _, Level, event, span};

/// The stages of an interval run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum Stage {
    /// Reading and validating telemetry
    Loading,
    /// Netting interconnector readings
    Netting,
    /// Deriving imports, exports and demand
    Demand,
    /// Allocating emissions and market value
    Solving,
    /// Joining and checking the records
    Merging,
    /// Writing the records to the sink
    Persisting,
    /// Finished
    Done,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Loading => "LOADING",
            Self::Netting => "NETTING",
            Self::Demand => "DEMAND",
            Self::Solving => "SOLVING",
            Self::Merging => "MERGING",
            Self::Persisting => "PERSISTING",
            Self::Done => "DONE",
        })
    }
}

/// What a successful interval run produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    /// The interval processed
    pub interval: Interval,
    /// The network processed
    pub network: NetworkId,
    /// The name of the allocation strategy
    pub solver: &'static str,
    /// Regions with a complete record
    pub regions_processed: usize,
    /// Records the sink reported writing
    pub records_written: usize,
    /// Regions whose record carries the low-confidence caveat
    pub low_confidence: Vec<RegionId>,
    /// Regions left out of the batch because their record was incomplete
    pub dropped_regions: Vec<RegionId>,
    /// Whether conservation was verified (rather than skipped or downgraded)
    pub conservation_checked: bool,
}

/// A failed interval run: where it failed, for which key, and why.
#[derive(Debug, thiserror::Error)]
#[error("interval {start} of network {network} failed in {stage}: {error}")]
pub struct IntervalFailure {
    /// The stage that failed
    pub stage: Stage,
    /// The requested network
    pub network: NetworkId,
    /// The requested interval start
    pub start: OffsetDateTime,
    /// The cause
    #[source]
    pub error: FlowError,
}

impl IntervalFailure {
    /// Whether the caller may retry the interval later
    pub fn disposition(&self) -> Disposition {
        self.error.disposition()
    }
}

/// Runs the pipeline for one interval of one network at a time.
///
/// The orchestrator holds no per-interval state, so a single instance may run
/// any number of distinct intervals concurrently. The reader and sink are the
/// only suspension points; every other stage is an in-memory transform.
#[derive(Debug)]
pub struct IntervalOrchestrator<R, S, F> {
    config: FlowConfig,
    networks: Map<NetworkId, NetworkConfig>,
    reader: R,
    sink: S,
    solver: F,
}

impl<R, S, F> IntervalOrchestrator<R, S, F>
where
    R: TimeSeriesReader + Sync,
    S: AggregateSink + Sync,
    F: FlowSolver + Sync,
    FlowError: From<F::Error>,
{
    /// Assemble an orchestrator for the given networks.
    pub fn new(
        config: FlowConfig,
        networks: impl IntoIterator<Item = NetworkConfig>,
        reader: R,
        sink: S,
        solver: F,
    ) -> Self {
        Self {
            config,
            networks: networks
                .into_iter()
                .map(|network| (network.code.clone(), network))
                .collect(),
            reader,
            sink,
            solver,
        }
    }

    /// The engine configuration
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// The configured networks
    pub fn networks(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.values()
    }

    /// The sink the orchestrator writes to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Compute and persist the aggregates of the interval of `network` starting at `start`.
    ///
    /// # Returns
    ///
    /// - `Ok(summary)` once the full batch for the interval has been written
    /// - `Err(failure)` naming the failed stage; nothing was persisted unless
    ///   the failure is in `PERSISTING`, in which case the sink's atomicity
    ///   guarantees nothing partial was
    pub async fn run_interval(
        &self,
        start: OffsetDateTime,
        network: &NetworkId,
    ) -> Result<Summary, IntervalFailure> {
        let span = span!(Level::INFO, "interval", %network, %start);
        async {
            let mut stage = Stage::Loading;
            match self.pipeline(start, network, &mut stage).await {
                Ok(summary) => {
                    event!(
                        Level::INFO,
                        solver = summary.solver,
                        regions = summary.regions_processed,
                        written = summary.records_written,
                        low_confidence = summary.low_confidence.len(),
                        dropped = summary.dropped_regions.len(),
                        "interval complete"
                    );
                    Ok(summary)
                }
                Err(error) => {
                    let disposition = error.disposition();
                    match disposition {
                        Disposition::Retryable => {
                            event!(Level::WARN, %stage, %error, "interval failed, retryable")
                        }
                        Disposition::Fatal => {
                            event!(Level::ERROR, %stage, %error, "interval failed")
                        }
                    }
                    Err(IntervalFailure {
                        stage,
                        network: network.clone(),
                        start,
                        error,
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn pipeline(
        &self,
        start: OffsetDateTime,
        network: &NetworkId,
        stage: &mut Stage,
    ) -> Result<Summary, FlowError> {
        let config = self
            .networks
            .get(network)
            .ok_or_else(|| FlowError::UnknownNetwork(network.clone()))?;
        let interval = config.interval_at(start)?;

        let (readings, raw_flows, raw_prices) = try_join!(
            self.read("generation", self.reader.load_generation(&interval, network)),
            self.read(
                "interconnector flows",
                self.reader.load_interconnector_flows(&interval, network)
            ),
            self.read("prices", self.reader.load_region_prices(&interval, network)),
        )?;
        event!(
            Level::DEBUG,
            readings = readings.len(),
            flows = raw_flows.len(),
            prices = raw_prices.len(),
            "telemetry loaded"
        );
        let generation = aggregate_generation(&interval, config, &readings)?;
        let prices = collect_prices(&interval, config, &raw_prices)?;

        advance(stage, Stage::Netting);
        let flows = net_flows(&interval, config, &raw_flows)?;

        advance(stage, Stage::Demand);
        let imports_exports = region_import_export(&interval, network, &flows);
        let demand = calculate_demand(&generation, &imports_exports);

        advance(stage, Stage::Solving);
        let allocation = self.solver.solve(SolverInput {
            generation: &generation,
            prices: &prices,
            flows: &flows,
        })?;

        advance(stage, Stage::Merging);
        let Merged { records, dropped } = merge(&interval, network, &demand, &allocation);
        let low_confidence = records
            .iter()
            .filter(|record| record.low_confidence)
            .map(|record| record.region.clone())
            .collect::<Vec<_>>();
        let caveats = !low_confidence.is_empty() || !dropped.is_empty();
        let conservation_checked = self.verify(&records, caveats)?;

        advance(stage, Stage::Persisting);
        let written = self.persist(&records).await?;

        advance(stage, Stage::Done);
        Ok(Summary {
            interval,
            network: network.clone(),
            solver: self.solver.name(),
            regions_processed: records.len(),
            records_written: written,
            low_confidence,
            dropped_regions: dropped,
            conservation_checked,
        })
    }

    async fn read<T, E>(
        &self,
        what: &'static str,
        load: impl Future<Output = Result<T, E>>,
    ) -> Result<T, FlowError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match timeout(self.config.reader_timeout, load).await {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(source)) => Err(FlowError::ReaderFailure {
                what,
                source: Box::new(source),
            }),
            Err(_) => Err(FlowError::Timeout {
                operation: what,
                after: self.config.reader_timeout,
            }),
        }
    }

    // Returns whether conservation was actually verified. Intervals with
    // caveats cannot balance exactly, so a violation there is only logged.
    fn verify(&self, records: &[FlowAllocationResult], caveats: bool) -> Result<bool, FlowError> {
        match check_conservation(records, self.config.tolerance) {
            Ok(()) => Ok(!caveats),
            Err(error) if self.config.mode == ConservationMode::Strict && !caveats => Err(error),
            Err(error) => {
                event!(Level::WARN, %error, caveats, "conservation check failed");
                Ok(false)
            }
        }
    }

    async fn persist(&self, records: &[FlowAllocationResult]) -> Result<usize, FlowError> {
        if records.is_empty() {
            return Err(FlowError::NoInputData("flow result"));
        }

        // Rounding is deferred to here so no intermediate value is truncated
        let batch = records
            .iter()
            .map(|record| record.rounded(self.config.precision))
            .collect::<Vec<_>>();

        let written = match timeout(self.config.sink_timeout, self.sink.upsert_batch(&batch)).await
        {
            Ok(Ok(written)) => written,
            Ok(Err(source)) => return Err(FlowError::PersistenceFailure(Box::new(source))),
            Err(_) => {
                return Err(FlowError::Timeout {
                    operation: "upsert",
                    after: self.config.sink_timeout,
                });
            }
        };

        if written != batch.len() {
            return Err(FlowError::PartialWrite {
                written,
                expected: batch.len(),
            });
        }

        Ok(written)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    event!(Level::DEBUG, from = %stage, to = %next, "stage transition");
    *stage = next;
}
