#![allow(dead_code)]

use gfa_core::models::{Interval, NetworkConfig};
use gfa_sqlite::{Db, config::SqliteConfig, types::Facility};
use std::time::Duration;
use time::{OffsetDateTime, macros::datetime};

pub const START: OffsetDateTime = datetime!(2023-04-09 00:05:00 UTC);
pub const FIVE_MINUTES: Duration = Duration::from_secs(300);

pub fn nem() -> NetworkConfig {
    NetworkConfig {
        code: "NEM".into(),
        regions: vec!["NSW1".into(), "QLD1".into(), "VIC1".into()],
        interconnectors: true,
        interval: FIVE_MINUTES,
    }
}

pub fn interval() -> Interval {
    Interval::aligned(START, FIVE_MINUTES).unwrap()
}

/// Opens an empty in-memory database and registers the facilities of the NEM fixture.
pub async fn open() -> anyhow::Result<Db> {
    let db = Db::open(&SqliteConfig::default()).await?;

    for facility in [
        Facility::generator("ERARING", "NEM", "NSW1", 0.9),
        Facility::generator("DARLING_DOWNS", "NEM", "QLD1", 0.5),
        Facility::generator("LOY_YANG_A", "NEM", "VIC1", 1.2),
        Facility::generator("TUMUT3_PUMP", "NEM", "NSW1", 0.0),
        Facility::interconnector("N-Q-MNSP1", "NEM", "NSW1", "QLD1"),
        Facility::interconnector("VIC1-NSW1", "NEM", "VIC1", "NSW1"),
    ] {
        db.insert_facility(&facility).await?;
    }

    Ok(db)
}

/// Seeds one interval of telemetry, at power levels chosen so that energies are round
/// numbers: NSW1 makes 100 MWh, QLD1 50 MWh and VIC1 75 MWh, while NSW1 sends 30 MWh to
/// QLD1 and 10 MWh to VIC1 (reported as a negative reading on the VIC1-NSW1 link).
pub async fn seed(db: &Db, at: OffsetDateTime) -> anyhow::Result<()> {
    let network = "NEM".into();
    for (facility, generated) in [
        ("ERARING", 1200.0),
        ("DARLING_DOWNS", 600.0),
        ("LOY_YANG_A", 900.0),
        ("TUMUT3_PUMP", -240.0),
        ("N-Q-MNSP1", 360.0),
        ("VIC1-NSW1", -120.0),
    ] {
        db.insert_scada(at, &network, &facility.into(), generated)
            .await?;
    }

    for (region, price) in [("NSW1", 100.0), ("QLD1", 80.0), ("VIC1", 50.0)] {
        db.insert_price(at, &network, &region.into(), price).await?;
    }

    Ok(())
}
