use crate::{
    Db,
    types::{DateTime, FlowRow, PriceRow, ScadaRow},
};
use gfa_core::{
    models::{GenerationReading, InterconnectorFlow, Interval, NetworkId, RegionPrice},
    ports::TimeSeriesReader,
};

// A facility may report several times within a long interval; we take the
// average power over the window.
const GENERATION: &str = r#"
    select
        s.facility_code as facility_code,
        f.network_region as network_region,
        avg(s.generated) as generated,
        f.emissions_factor as emissions_factor,
        f.is_interconnector as is_interconnector
    from
        facility_scada s
    join
        facility f on f.code = s.facility_code
    where
        s.network_id = $1
    and
        s.interval >= $2
    and
        s.interval < $3
    group by
        s.facility_code, f.network_region, f.emissions_factor, f.is_interconnector
"#;

const FLOWS: &str = r#"
    select
        region_from,
        region_to,
        sum(generated) as generated
    from (
        select
            f.interconnector_region_from as region_from,
            f.interconnector_region_to as region_to,
            avg(s.generated) as generated
        from
            facility_scada s
        join
            facility f on f.code = s.facility_code
        where
            s.network_id = $1
        and
            f.is_interconnector
        and
            s.interval >= $2
        and
            s.interval < $3
        group by
            f.code, f.interconnector_region_from, f.interconnector_region_to
    )
    group by
        region_from, region_to
"#;

const PRICES: &str = r#"
    select
        network_region,
        avg(price) as price
    from
        region_price
    where
        network_id = $1
    and
        interval >= $2
    and
        interval < $3
    group by
        network_region
"#;

impl TimeSeriesReader for Db {
    type Error = sqlx::Error;

    async fn load_generation(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> Result<Vec<GenerationReading>, Self::Error> {
        let rows = sqlx::query_as::<_, ScadaRow>(GENERATION)
            .bind(network.as_str())
            .bind(DateTime::from(interval.start))
            .bind(DateTime::from(interval.end()))
            .fetch_all(&self.reader)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| GenerationReading {
                interval: *interval,
                facility: row.facility_code.into(),
                network: network.clone(),
                region: row.network_region.into(),
                generated: row.generated,
                emissions_factor: row.emissions_factor.unwrap_or(0.0),
                is_interconnector: row.is_interconnector,
            })
            .collect())
    }

    async fn load_interconnector_flows(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> Result<Vec<InterconnectorFlow>, Self::Error> {
        let rows = sqlx::query_as::<_, FlowRow>(FLOWS)
            .bind(network.as_str())
            .bind(DateTime::from(interval.start))
            .bind(DateTime::from(interval.end()))
            .fetch_all(&self.reader)
            .await?;

        // scada reports power, the engine works in energy
        let hours = interval.hours();
        Ok(rows
            .into_iter()
            .map(|row| InterconnectorFlow {
                interval: *interval,
                region_from: row.region_from.into(),
                region_to: row.region_to.into(),
                energy: row.generated * hours,
            })
            .collect())
    }

    async fn load_region_prices(
        &self,
        interval: &Interval,
        network: &NetworkId,
    ) -> Result<Vec<RegionPrice>, Self::Error> {
        let rows = sqlx::query_as::<_, PriceRow>(PRICES)
            .bind(network.as_str())
            .bind(DateTime::from(interval.start))
            .bind(DateTime::from(interval.end()))
            .fetch_all(&self.reader)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| RegionPrice {
                interval: *interval,
                network: network.clone(),
                region: row.network_region.into(),
                price: row.price,
            })
            .collect())
    }
}
