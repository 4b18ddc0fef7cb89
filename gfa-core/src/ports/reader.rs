use crate::models::{GenerationReading, InterconnectorFlow, Interval, NetworkId, RegionPrice};

/// Repository interface for interval telemetry.
///
/// Every operation takes the exact interval window `[start, end)` and the
/// network to read. An interval with no telemetry is not an error: readers
/// return an empty vector and leave the missing-data decision to the engine.
///
/// Readers may return rows in any order; the engine canonicalizes ordering
/// itself.
pub trait TimeSeriesReader {
    /// Error type for storage operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the output of every facility (generators and interconnectors) of
    /// the network for the interval.
    fn load_generation(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> impl Future<Output = Result<Vec<GenerationReading>, Self::Error>> + Send;

    /// Load the directional interconnector energy of the network for the interval.
    fn load_interconnector_flows(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> impl Future<Output = Result<Vec<InterconnectorFlow>, Self::Error>> + Send;

    /// Load the regional prices of the network for the interval.
    fn load_region_prices(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> impl Future<Output = Result<Vec<RegionPrice>, Self::Error>> + Send;
}
