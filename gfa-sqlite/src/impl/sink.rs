use crate::{Db, types::DateTime};
use gfa_core::{models::FlowAllocationResult, ports::AggregateSink};
use tracing::{Level, event};

const UPSERT: &str = r#"
    insert into aggregate_network_flows (
        interval_start,
        network_id,
        network_region,
        energy_imports,
        energy_exports,
        emissions_imports,
        emissions_exports,
        market_value_imports,
        market_value_exports,
        low_confidence
    )
    values
        ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    on conflict
        (interval_start, network_id, network_region)
    do update set
        energy_imports = excluded.energy_imports,
        energy_exports = excluded.energy_exports,
        emissions_imports = excluded.emissions_imports,
        emissions_exports = excluded.emissions_exports,
        market_value_imports = excluded.market_value_imports,
        market_value_exports = excluded.market_value_exports,
        low_confidence = excluded.low_confidence
"#;

impl AggregateSink for Db {
    type Error = sqlx::Error;

    /// The batch is written in a single transaction. If any statement fails,
    /// or the future is dropped before the commit, the transaction is rolled
    /// back and no record of the batch is visible.
    async fn upsert_batch(&self, records: &[FlowAllocationResult]) -> Result<usize, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let mut written = 0;
        for record in records {
            let result = sqlx::query(UPSERT)
                .bind(DateTime::from(record.interval.start))
                .bind(record.network.as_str())
                .bind(record.region.as_str())
                .bind(record.energy_imports)
                .bind(record.energy_exports)
                .bind(record.emissions_imports)
                .bind(record.emissions_exports)
                .bind(record.market_value_imports)
                .bind(record.market_value_exports)
                .bind(record.low_confidence)
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected() as usize;
        }

        tx.commit().await?;

        event!(Level::DEBUG, written, "aggregates upserted");
        Ok(written)
    }
}
