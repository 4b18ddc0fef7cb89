use gfa_core::models::NetworkConfig;
use gfa_solver::{Disposition, FlowConfig, IntervalOrchestrator, SolverVersion, Stage};
use gfaworker::{
    fixture::{Collector, Fixture},
    run_networks,
};
use rstest::*;
use std::time::Duration;
use time::macros::datetime;

#[fixture]
fn two_regions() -> Fixture {
    serde_json::from_str(include_str!("../demos/two_regions.json")).unwrap()
}

#[rstest]
#[tokio::test]
async fn the_demo_fixture_solves(two_regions: Fixture) {
    assert_eq!(two_regions.starts().len(), 1);

    let report = two_regions.solve(FlowConfig::default()).await;
    assert!(report.failures.is_empty());
    assert_eq!(report.summaries.len(), 1);
    assert_eq!(report.summaries[0].solver, "proportional");

    let records = &report.records;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].region.as_str(), "A");
    assert_eq!(records[0].energy_exports, 25.0);
    assert_eq!(records[0].emissions_exports, 20.0);
    assert_eq!(records[0].market_value_exports, 1000.0);
    assert_eq!(records[1].region.as_str(), "B");
    assert_eq!(records[1].energy_imports, 25.0);
    assert_eq!(records[1].emissions_imports, 20.0);
}

#[rstest]
#[tokio::test]
async fn the_strategy_follows_the_configuration(two_regions: Fixture) {
    let config = FlowConfig {
        solver: SolverVersion::V2,
        ..Default::default()
    };
    let report = two_regions.solve(config).await;
    assert_eq!(report.summaries[0].solver, "tracing");
    assert_eq!(report.records.len(), 2);
}

#[rstest]
#[tokio::test]
async fn failed_intervals_are_reported(mut two_regions: Fixture) {
    // a second interval with generation but no interconnector readings
    let mut later = two_regions.generation.clone();
    for reading in &mut later {
        reading.interval.start += time::Duration::HOUR;
    }
    two_regions.generation.extend(later);

    let report = two_regions.solve(FlowConfig::default()).await;
    assert_eq!(report.summaries.len(), 1);
    assert_eq!(report.failures.len(), 1);

    let failure = &report.failures[0];
    assert_eq!(failure.stage, Stage::Netting);
    assert_eq!(failure.disposition, Disposition::Retryable);

    // only the complete interval was persisted
    assert_eq!(report.records.len(), 2);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["failures"][0]["stage"], "NETTING");
    assert_eq!(json["failures"][0]["disposition"], "retryable");
    assert_eq!(json["failures"][0]["start"], "2023-04-09T01:00:00Z");
}

#[rstest]
#[tokio::test]
async fn a_network_without_a_representable_interval_is_skipped(two_regions: Fixture) {
    // no interval of this length ends after the earliest representable date
    let far = NetworkConfig {
        code: "FAR".into(),
        regions: vec!["A".into()],
        interconnectors: false,
        interval: Duration::MAX,
    };
    let networks = [far, two_regions.network.clone()];
    let engine = IntervalOrchestrator::new(
        FlowConfig::default(),
        networks,
        two_regions,
        Collector::default(),
        SolverVersion::V3.solver(),
    );

    let summaries = run_networks(&engine, datetime!(2023-04-09 01:00:00 UTC)).await;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].network.as_str(), "TEST");
    assert_eq!(engine.sink().take().await.len(), 2);
}
