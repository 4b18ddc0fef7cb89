use super::{FacilityCode, Interval, NetworkId, RegionId};

/// A single facility's output for an interval, as delivered by a reader.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationReading {
    /// The interval of the reading
    pub interval: Interval,

    /// The metered facility
    pub facility: FacilityCode,

    /// The network the facility is registered in
    pub network: NetworkId,

    /// The region the facility is located in
    pub region: RegionId,

    /// Average power over the interval, in MW. Negative for loads.
    pub generated: f64,

    /// Emissions factor of the facility, in tCO2e/MWh
    #[cfg_attr(feature = "serde", serde(default))]
    pub emissions_factor: f64,

    /// Whether this facility is an interconnector rather than a generator
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_interconnector: bool,
}

impl GenerationReading {
    /// Energy produced over the interval, in MWh
    pub fn energy(&self) -> f64 {
        self.generated * self.interval.hours()
    }

    /// Emissions attributable to the energy produced, in tCO2e
    pub fn emissions(&self) -> f64 {
        if self.emissions_factor > 0.0 {
            self.energy() * self.emissions_factor
        } else {
            0.0
        }
    }
}

/// Energy observed flowing from one region into another over an interval.
///
/// Readers may supply both directions of the same link, or one direction with
/// a signed value; either way the rows are netted before use.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterconnectorFlow {
    /// The interval of the reading
    pub interval: Interval,

    /// The region the energy leaves
    pub region_from: RegionId,

    /// The region the energy enters
    pub region_to: RegionId,

    /// The energy moved, in MWh
    pub energy: f64,
}

/// The market price of a region for an interval.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionPrice {
    /// The interval of the price
    pub interval: Interval,

    /// The network of the region
    pub network: NetworkId,

    /// The priced region
    pub region: RegionId,

    /// Price per MWh
    pub price: f64,
}
