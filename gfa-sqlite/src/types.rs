//! Type definitions for the SQLite implementation.
//!
//! The public types are what callers hand to the seeding helpers; the row
//! types map query results and stay internal to the crate.

use gfa_core::models::{FacilityCode, NetworkId, RegionId};

mod datetime;
pub use datetime::DateTime;

/// A metered facility, as registered in the `facility` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    /// The facility code
    pub code: FacilityCode,
    /// The network the facility is registered in
    pub network: NetworkId,
    /// The region the facility is located in
    pub region: RegionId,
    /// Emissions factor in tCO2e/MWh, if known
    pub emissions_factor: Option<f64>,
    /// For interconnectors, the `(from, to)` regions of positive flow
    pub interconnector: Option<(RegionId, RegionId)>,
}

impl Facility {
    /// A generating (or consuming) unit located in `region`
    pub fn generator(
        code: impl Into<FacilityCode>,
        network: impl Into<NetworkId>,
        region: impl Into<RegionId>,
        emissions_factor: f64,
    ) -> Self {
        Self {
            code: code.into(),
            network: network.into(),
            region: region.into(),
            emissions_factor: Some(emissions_factor),
            interconnector: None,
        }
    }

    /// An interconnector whose positive readings flow from `from` into `to`
    pub fn interconnector(
        code: impl Into<FacilityCode>,
        network: impl Into<NetworkId>,
        from: impl Into<RegionId>,
        to: impl Into<RegionId>,
    ) -> Self {
        let from = from.into();
        Self {
            code: code.into(),
            network: network.into(),
            region: from.clone(),
            emissions_factor: None,
            interconnector: Some((from, to.into())),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ScadaRow {
    pub facility_code: String,
    pub network_region: String,
    pub generated: f64,
    pub emissions_factor: Option<f64>,
    pub is_interconnector: bool,
}

#[derive(sqlx::FromRow)]
pub(crate) struct FlowRow {
    pub region_from: String,
    pub region_to: String,
    pub generated: f64,
}

#[derive(sqlx::FromRow)]
pub(crate) struct PriceRow {
    pub network_region: String,
    pub price: f64,
}

#[derive(sqlx::FromRow)]
pub(crate) struct AggregateRow {
    pub network_region: String,
    pub energy_imports: f64,
    pub energy_exports: f64,
    pub emissions_imports: f64,
    pub emissions_exports: f64,
    pub market_value_imports: f64,
    pub market_value_exports: f64,
    pub low_confidence: bool,
}
