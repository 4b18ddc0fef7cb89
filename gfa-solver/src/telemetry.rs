use crate::FlowError;
use gfa_core::models::{
    FacilityCode, GenerationReading, Interval, Map, NetworkConfig, RegionEnergyEmissions,
    RegionId, RegionPrice,
};

/// Aggregate facility readings into generation-only energy and emissions per region.
///
/// Interconnector readings are skipped. Every other reading registers its
/// region, but only positive output counts as generation; a region whose
/// facilities all consumed or idled therefore appears with zero energy (and an
/// undefined intensity) rather than disappearing.
///
/// The result is sorted by region, and each region is summed in facility
/// order.
///
/// # Errors
///
/// - `NoInputData` if no region could be registered
/// - `UnknownRegion` if a reading references a region outside the network
/// - `MalformedInput` for readings of another network or interval, or non-finite values
pub fn aggregate_generation(
    interval: &Interval,
    network: &NetworkConfig,
    readings: &[GenerationReading],
) -> Result<Map<RegionId, RegionEnergyEmissions>, FlowError> {
    let mut regions: Map<RegionId, Vec<(&FacilityCode, f64, f64)>> = Map::default();

    for reading in readings {
        if reading.network != network.code || reading.interval != *interval {
            return Err(FlowError::MalformedInput(format!(
                "generation row of {} in {} for {} while aggregating {} in {}",
                reading.facility, reading.network, reading.interval, network.code, interval
            )));
        }
        if !network.contains(&reading.region) {
            return Err(FlowError::UnknownRegion {
                kind: "generation",
                region: reading.region.clone(),
            });
        }
        if !reading.generated.is_finite() || !reading.emissions_factor.is_finite() {
            return Err(FlowError::MalformedInput(format!(
                "non-finite generation for facility {}",
                reading.facility
            )));
        }

        if reading.is_interconnector {
            continue;
        }

        let facilities = regions.entry(reading.region.clone()).or_default();
        if reading.generated > 0.0 {
            facilities.push((&reading.facility, reading.energy(), reading.emissions()));
        }
    }

    if regions.is_empty() {
        return Err(FlowError::NoInputData("generation"));
    }

    Ok(regions
        .into_sorted()
        .into_iter()
        .map(|(region, mut facilities)| {
            facilities.sort_unstable_by(|a, b| a.0.cmp(b.0).then(a.1.total_cmp(&b.1)));
            let energy = facilities.iter().map(|(_, energy, _)| energy).sum();
            let emissions = facilities.iter().map(|(_, _, emissions)| emissions).sum();
            let record = RegionEnergyEmissions::new(
                *interval,
                network.code.clone(),
                region.clone(),
                energy,
                emissions,
            );
            (region, record)
        })
        .collect())
}

/// Collect regional prices into a lookup sorted by region.
///
/// # Errors
///
/// - `UnknownRegion` if a price references a region outside the network
/// - `MalformedInput` for prices of another network or interval, non-finite
///   prices, or a region priced twice
pub fn collect_prices(
    interval: &Interval,
    network: &NetworkConfig,
    prices: &[RegionPrice],
) -> Result<Map<RegionId, f64>, FlowError> {
    let mut lookup = Map::default();

    for price in prices {
        if price.network != network.code || price.interval != *interval {
            return Err(FlowError::MalformedInput(format!(
                "price row of {} in {} for {} while collecting {} in {}",
                price.region, price.network, price.interval, network.code, interval
            )));
        }
        if !network.contains(&price.region) {
            return Err(FlowError::UnknownRegion {
                kind: "price",
                region: price.region.clone(),
            });
        }
        if !price.price.is_finite() {
            return Err(FlowError::MalformedInput(format!(
                "non-finite price for region {}",
                price.region
            )));
        }
        if lookup.insert(price.region.clone(), price.price).is_some() {
            return Err(FlowError::MalformedInput(format!(
                "region {} priced twice",
                price.region
            )));
        }
    }

    Ok(lookup.into_sorted())
}
