//! Offline inputs and outputs for the `solve` subcommand.
//!
//! A [`Fixture`] holds a network description and its telemetry for any number
//! of intervals. It serves as the engine's reader, while a [`Collector`]
//! stands in for the database as its sink, so the whole pipeline runs without
//! any storage.

use gfa_core::{
    models::{
        FlowAllocationResult, GenerationReading, InterconnectorFlow, Interval, NetworkConfig,
        NetworkId, RegionPrice,
    },
    ports::{AggregateSink, TimeSeriesReader},
};
use gfa_solver::{AnySolver, Disposition, FlowConfig, IntervalOrchestrator, Stage, Summary};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// A network and its telemetry, as read from JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Fixture {
    /// The network the telemetry belongs to
    pub network: NetworkConfig,
    /// Facility readings, for any intervals
    #[serde(default)]
    pub generation: Vec<GenerationReading>,
    /// Interconnector readings, for any intervals
    #[serde(default)]
    pub flows: Vec<InterconnectorFlow>,
    /// Regional prices, for any intervals
    #[serde(default)]
    pub prices: Vec<RegionPrice>,
}

impl Fixture {
    /// The distinct interval starts present in the telemetry, in order
    pub fn starts(&self) -> Vec<OffsetDateTime> {
        let mut starts = self
            .generation
            .iter()
            .map(|r| r.interval.start)
            .chain(self.flows.iter().map(|f| f.interval.start))
            .chain(self.prices.iter().map(|p| p.interval.start))
            .collect::<Vec<_>>();
        starts.sort_unstable();
        starts.dedup();
        starts
    }

    /// Run every interval of the fixture through the engine.
    ///
    /// Failed intervals do not stop the run; they are reported alongside the
    /// successful ones.
    pub async fn solve(self, config: FlowConfig) -> Report {
        let starts = self.starts();
        let code = self.network.code.clone();
        let networks = [self.network.clone()];
        let solver: AnySolver = config.solver.solver();
        let engine = IntervalOrchestrator::new(config, networks, self, Collector::default(), solver);

        let mut summaries = Vec::new();
        let mut failures = Vec::new();
        for start in starts {
            match engine.run_interval(start, &code).await {
                Ok(summary) => summaries.push(summary),
                Err(failure) => failures.push(FailureReport {
                    start,
                    stage: failure.stage,
                    disposition: failure.disposition(),
                    error: failure.error.to_string(),
                }),
            }
        }

        Report {
            summaries,
            failures,
            records: engine.sink().take().await,
        }
    }
}

impl TimeSeriesReader for Fixture {
    type Error = Infallible;

    async fn load_generation(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> Result<Vec<GenerationReading>, Self::Error> {
        Ok(self
            .generation
            .iter()
            .filter(|r| r.interval == *interval && r.network == *network)
            .cloned()
            .collect())
    }

    async fn load_interconnector_flows(
        &self,
        interval: &Interval,
        _network: &NetworkId,
    ) -> Result<Vec<InterconnectorFlow>, Self::Error> {
        // a fixture describes a single network
        Ok(self
            .flows
            .iter()
            .filter(|f| f.interval == *interval)
            .cloned()
            .collect())
    }

    async fn load_region_prices(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> Result<Vec<RegionPrice>, Self::Error> {
        Ok(self
            .prices
            .iter()
            .filter(|p| p.interval == *interval && p.network == *network)
            .cloned()
            .collect())
    }
}

/// A sink that keeps every record in memory, replacing records by key as a database would.
#[derive(Debug, Default)]
pub struct Collector(Mutex<Vec<FlowAllocationResult>>);

impl Collector {
    /// Drain the collected records, sorted by interval then region
    pub async fn take(&self) -> Vec<FlowAllocationResult> {
        let mut records = std::mem::take(&mut *self.0.lock().await);
        records.sort_by(|a, b| {
            (a.interval.start, &a.network, &a.region).cmp(&(b.interval.start, &b.network, &b.region))
        });
        records
    }
}

impl AggregateSink for Collector {
    type Error = Infallible;

    async fn upsert_batch(&self, records: &[FlowAllocationResult]) -> Result<usize, Self::Error> {
        let mut stored = self.0.lock().await;
        for record in records {
            let key = (&record.interval, &record.network, &record.region);
            match stored
                .iter_mut()
                .find(|r| (&r.interval, &r.network, &r.region) == key)
            {
                Some(existing) => *existing = record.clone(),
                None => stored.push(record.clone()),
            }
        }
        Ok(records.len())
    }
}

/// Why an interval of the fixture could not be computed.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    /// The requested interval start
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// The stage that failed
    pub stage: Stage,
    /// Whether a rerun could succeed
    pub disposition: Disposition,
    /// The cause
    pub error: String,
}

/// The outcome of solving a fixture.
#[derive(Debug, Serialize)]
pub struct Report {
    /// One summary per computed interval
    pub summaries: Vec<Summary>,
    /// One report per failed interval
    pub failures: Vec<FailureReport>,
    /// Every persisted record
    pub records: Vec<FlowAllocationResult>,
}
