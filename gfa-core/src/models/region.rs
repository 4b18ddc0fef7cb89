use super::{Interval, NetworkId, RegionId, ratio};

/// Generation-only energy and emissions of a region for an interval.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionEnergyEmissions {
    /// The interval
    pub interval: Interval,
    /// The network
    pub network: NetworkId,
    /// The region
    pub region: RegionId,
    /// Energy generated, in MWh
    pub energy: f64,
    /// Emissions of that generation, in tCO2e
    pub emissions: f64,
    /// `emissions / energy`, or 0 when there was no energy
    pub emissions_intensity: f64,
}

impl RegionEnergyEmissions {
    /// Construct the record, deriving the intensity from the totals.
    pub fn new(
        interval: Interval,
        network: NetworkId,
        region: RegionId,
        energy: f64,
        emissions: f64,
    ) -> Self {
        Self {
            interval,
            network,
            region,
            energy,
            emissions,
            emissions_intensity: ratio(emissions, energy),
        }
    }

    /// Whether the intensity of this region is actually defined
    pub fn has_energy(&self) -> bool {
        self.energy > 0.0
    }
}

/// The total energy a region received and sent over interconnectors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionImportExport {
    /// The interval
    pub interval: Interval,
    /// The network
    pub network: NetworkId,
    /// The region
    pub region: RegionId,
    /// Energy imported, in MWh
    pub energy_imports: f64,
    /// Energy exported, in MWh
    pub energy_exports: f64,
}

/// Generation and interconnector totals of a region, with the derived demand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionDemand {
    /// Generation totals
    pub generation: RegionEnergyEmissions,
    /// Interconnector totals
    pub flows: RegionImportExport,
    /// `energy + energy_imports - energy_exports`
    pub demand: f64,
}

impl RegionDemand {
    /// Combine the two halves of a region's record.
    pub fn new(generation: RegionEnergyEmissions, flows: RegionImportExport) -> Self {
        let demand = generation.energy + flows.energy_imports - flows.energy_exports;
        Self {
            generation,
            flows,
            demand,
        }
    }

    /// The region of the record
    pub fn region(&self) -> &RegionId {
        &self.generation.region
    }
}
