use crate::{
    Db,
    types::{AggregateRow, DateTime, Facility},
};
use gfa_core::models::{FacilityCode, FlowAllocationResult, Interval, NetworkId, RegionId};
use time::OffsetDateTime;

impl Db {
    /// Register a facility, replacing any previous registration of its code.
    pub async fn insert_facility(&self, facility: &Facility) -> Result<(), sqlx::Error> {
        let (from, to) = facility
            .interconnector
            .as_ref()
            .map(|(from, to)| (Some(from.as_str()), Some(to.as_str())))
            .unwrap_or_default();

        sqlx::query(
            r#"
            insert into
                facility (code, network_id, network_region, emissions_factor, is_interconnector, interconnector_region_from, interconnector_region_to)
            values
                ($1, $2, $3, $4, $5, $6, $7)
            on conflict (code) do update set
                network_id = excluded.network_id,
                network_region = excluded.network_region,
                emissions_factor = excluded.emissions_factor,
                is_interconnector = excluded.is_interconnector,
                interconnector_region_from = excluded.interconnector_region_from,
                interconnector_region_to = excluded.interconnector_region_to
            "#,
        )
        .bind(facility.code.as_str())
        .bind(facility.network.as_str())
        .bind(facility.region.as_str())
        .bind(facility.emissions_factor)
        .bind(facility.interconnector.is_some())
        .bind(from)
        .bind(to)
        .execute(&self.writer)
        .await?;

        Ok(())
    }

    /// Record the average power (MW) of a facility over the interval starting at `at`.
    pub async fn insert_scada(
        &self,
        at: OffsetDateTime,
        network: &NetworkId,
        facility: &FacilityCode,
        generated: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            insert into
                facility_scada (interval, network_id, facility_code, generated)
            values
                ($1, $2, $3, $4)
            on conflict (interval, network_id, facility_code) do update set
                generated = excluded.generated
            "#,
        )
        .bind(DateTime::from(at))
        .bind(network.as_str())
        .bind(facility.as_str())
        .bind(generated)
        .execute(&self.writer)
        .await?;

        Ok(())
    }

    /// Record the market price of a region for the interval starting at `at`.
    pub async fn insert_price(
        &self,
        at: OffsetDateTime,
        network: &NetworkId,
        region: &RegionId,
        price: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            insert into
                region_price (interval, network_id, network_region, price)
            values
                ($1, $2, $3, $4)
            on conflict (interval, network_id, network_region) do update set
                price = excluded.price
            "#,
        )
        .bind(DateTime::from(at))
        .bind(network.as_str())
        .bind(region.as_str())
        .bind(price)
        .execute(&self.writer)
        .await?;

        Ok(())
    }

    /// Read back the aggregates persisted for an interval of a network, sorted by region.
    pub async fn get_flow_aggregates(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> Result<Vec<FlowAllocationResult>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AggregateRow>(
            r#"
            select
                network_region,
                energy_imports,
                energy_exports,
                emissions_imports,
                emissions_exports,
                market_value_imports,
                market_value_exports,
                low_confidence
            from
                aggregate_network_flows
            where
                interval_start = $1
            and
                network_id = $2
            order by
                network_region
            "#,
        )
        .bind(DateTime::from(interval.start))
        .bind(network.as_str())
        .fetch_all(&self.reader)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FlowAllocationResult {
                interval: *interval,
                network: network.clone(),
                region: row.network_region.into(),
                energy_imports: row.energy_imports,
                energy_exports: row.energy_exports,
                emissions_imports: row.emissions_imports,
                emissions_exports: row.emissions_exports,
                market_value_imports: row.market_value_imports,
                market_value_exports: row.market_value_exports,
                low_confidence: row.low_confidence,
            })
            .collect())
    }
}
