#![allow(dead_code)]

use gfa_core::{
    models::{
        FlowAllocationResult, GenerationReading, InterconnectorFlow, Interval, NetworkConfig,
        NetworkId, RegionPrice,
    },
    ports::{AggregateSink, TimeSeriesReader},
};
use std::{sync::Mutex, time::Duration};
use time::{OffsetDateTime, macros::datetime};

pub const START: OffsetDateTime = datetime!(2023-04-09 00:00:00 UTC);

/// A network with hourly intervals, so power and energy coincide
pub fn hourly() -> NetworkConfig {
    NetworkConfig {
        code: "TEST".into(),
        regions: vec!["A".into(), "B".into(), "C".into()],
        interconnectors: true,
        interval: Duration::from_secs(3600),
    }
}

pub fn interval() -> Interval {
    Interval::aligned(START, Duration::from_secs(3600)).unwrap()
}

pub fn reading(facility: &str, region: &str, generated: f64, factor: f64) -> GenerationReading {
    GenerationReading {
        interval: interval(),
        facility: facility.into(),
        network: "TEST".into(),
        region: region.into(),
        generated,
        emissions_factor: factor,
        is_interconnector: false,
    }
}

pub fn flow(from: &str, to: &str, energy: f64) -> InterconnectorFlow {
    InterconnectorFlow {
        interval: interval(),
        region_from: from.into(),
        region_to: to.into(),
        energy,
    }
}

pub fn price(region: &str, price: f64) -> RegionPrice {
    RegionPrice {
        interval: interval(),
        network: "TEST".into(),
        region: region.into(),
        price,
    }
}

/// The two-region example: A generates 100 at 0.8, B generates 50 at 0.2,
/// and 30 flows A→B against 5 flowing back.
pub fn example() -> MemoryReader {
    MemoryReader {
        generation: vec![reading("A_GEN", "A", 100.0, 0.8), reading("B_GEN", "B", 50.0, 0.2)],
        flows: vec![flow("A", "B", 30.0), flow("B", "A", 5.0)],
        prices: vec![price("A", 40.0), price("B", 60.0)],
        ..Default::default()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("backend unavailable")]
pub struct Unavailable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Behaviour {
    #[default]
    Normal,
    Fail,
    Stall,
    Short,
}

async fn behave(behaviour: Behaviour) -> Result<(), Unavailable> {
    match behaviour {
        Behaviour::Fail => Err(Unavailable),
        Behaviour::Stall => std::future::pending().await,
        Behaviour::Normal | Behaviour::Short => Ok(()),
    }
}

/// Serves fixed telemetry, filtered to the requested interval and network
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    pub generation: Vec<GenerationReading>,
    pub flows: Vec<InterconnectorFlow>,
    pub prices: Vec<RegionPrice>,
    pub behaviour: Behaviour,
}

impl TimeSeriesReader for MemoryReader {
    type Error = Unavailable;

    async fn load_generation(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> Result<Vec<GenerationReading>, Self::Error> {
        behave(self.behaviour).await?;
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
        behave(self.behaviour).await?;
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
        behave(self.behaviour).await?;
        Ok(self
            .prices
            .iter()
            .filter(|p| p.interval == *interval && p.network == *network)
            .cloned()
            .collect())
    }
}

/// Records every batch it is handed
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Mutex<Vec<Vec<FlowAllocationResult>>>,
    pub behaviour: Behaviour,
}

impl MemorySink {
    pub fn with(behaviour: Behaviour) -> Self {
        Self {
            batches: Default::default(),
            behaviour,
        }
    }

    pub fn batches(&self) -> Vec<Vec<FlowAllocationResult>> {
        self.batches.lock().unwrap().clone()
    }
}

impl AggregateSink for MemorySink {
    type Error = Unavailable;

    async fn upsert_batch(&self, records: &[FlowAllocationResult]) -> Result<usize, Self::Error> {
        behave(self.behaviour).await?;
        if self.behaviour == Behaviour::Short {
            return Ok(records.len().saturating_sub(1));
        }
        self.batches.lock().unwrap().push(records.to_vec());
        Ok(records.len())
    }
}
