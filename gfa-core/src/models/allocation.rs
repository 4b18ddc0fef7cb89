use super::{Interval, Map, NetworkId, RegionId};

/// The emissions and market value carried by one netted flow.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowLeg {
    /// The exporting region
    pub region_from: RegionId,
    /// The importing region
    pub region_to: RegionId,
    /// The energy moved, in MWh
    pub energy: f64,
    /// Emissions attributed to that energy, in tCO2e
    pub emissions: f64,
    /// Market value attributed to that energy
    pub market_value: f64,
}

/// Emissions and market value accumulated at a region by a solver.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionAllocation {
    /// Emissions carried by energy entering the region
    pub emissions_imports: f64,
    /// Emissions carried by energy leaving the region
    pub emissions_exports: f64,
    /// Market value of energy entering the region
    pub market_value_imports: f64,
    /// Market value of energy leaving the region
    pub market_value_exports: f64,
    /// Whether the figures rely on an undefined intensity or a missing price
    pub low_confidence: bool,
}

/// The output of a solver: every leg, and the per-region accumulation of the legs.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowAllocation {
    /// One leg per netted flow, in the order of the flows
    pub legs: Vec<FlowLeg>,
    /// Accumulated figures, keyed and sorted by region
    pub regions: Map<RegionId, RegionAllocation>,
}

impl FlowAllocation {
    /// Accumulate `leg` onto both of its endpoints and record it.
    pub fn push(&mut self, leg: FlowLeg) {
        let exporter = self.regions.entry(leg.region_from.clone()).or_default();
        exporter.emissions_exports += leg.emissions;
        exporter.market_value_exports += leg.market_value;

        let importer = self.regions.entry(leg.region_to.clone()).or_default();
        importer.emissions_imports += leg.emissions;
        importer.market_value_imports += leg.market_value;

        self.legs.push(leg);
    }

    /// Flag `region` as low-confidence, creating an empty entry if needed.
    pub fn flag(&mut self, region: &RegionId) {
        self.regions
            .entry(region.clone())
            .or_default()
            .low_confidence = true;
    }

    /// Ensure `region` is reported, even if no leg touches it.
    pub fn include(&mut self, region: &RegionId) {
        self.regions.entry(region.clone()).or_default();
    }

    /// Reorder the regions canonically; the legs keep the order of the flows.
    pub fn into_sorted(self) -> Self {
        Self {
            legs: self.legs,
            regions: self.regions.into_sorted(),
        }
    }
}

/// The per-region, per-interval record persisted by the sink.
///
/// The natural key is `(interval, network, region)`; writing the same key
/// again replaces the record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowAllocationResult {
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
    /// Emissions imported, in tCO2e
    pub emissions_imports: f64,
    /// Emissions exported, in tCO2e
    pub emissions_exports: f64,
    /// Market value imported
    pub market_value_imports: f64,
    /// Market value exported
    pub market_value_exports: f64,
    /// Whether the emissions or value figures are approximate
    pub low_confidence: bool,
}

/// The most decimal places an `f64` can carry meaningfully
pub const MAX_PRECISION: u32 = f64::DIGITS;

impl FlowAllocationResult {
    /// Round every quantity to `precision` decimal places.
    ///
    /// Only the persistence boundary should call this; rounding intermediate
    /// values compounds error.
    /// `precision` is capped at [`MAX_PRECISION`]; values too large to
    /// scale already carry no fractional digits and are kept as they are.
    pub fn rounded(&self, precision: u32) -> Self {
        let scale = 10f64.powi(precision.min(MAX_PRECISION) as i32);
        let round = |x: f64| {
            let scaled = x * scale;
            // adding 0.0 normalizes -0.0, so identical inputs store identical bytes
            if scaled.is_finite() {
                scaled.round() / scale + 0.0
            } else {
                x + 0.0
            }
        };

        Self {
            interval: self.interval,
            network: self.network.clone(),
            region: self.region.clone(),
            energy_imports: round(self.energy_imports),
            energy_exports: round(self.energy_exports),
            emissions_imports: round(self.emissions_imports),
            emissions_exports: round(self.emissions_exports),
            market_value_imports: round(self.market_value_imports),
            market_value_exports: round(self.market_value_exports),
            low_confidence: self.low_confidence,
        }
    }
}
