mod common;

use approx::assert_relative_eq;
use common::{Behaviour, MemoryReader, MemorySink, START, example, flow, hourly, price, reading};
use gfa_core::models::RegionId;
use gfa_solver::{
    AnySolver, ConservationMode, Disposition, FlowConfig, FlowError, IntervalOrchestrator,
    SolverVersion, Stage,
};
use rstest::*;
use std::time::Duration;

type Orchestrator = IntervalOrchestrator<MemoryReader, MemorySink, AnySolver>;

fn orchestrator(reader: MemoryReader, sink: MemorySink, config: FlowConfig) -> Orchestrator {
    let solver = config.solver.solver();
    IntervalOrchestrator::new(config, [hourly()], reader, sink, solver)
}

#[fixture]
fn config() -> FlowConfig {
    FlowConfig::default()
}

#[rstest]
#[tokio::test]
async fn example_is_computed_and_persisted(config: FlowConfig) {
    let engine = orchestrator(example(), MemorySink::default(), config);
    let summary = engine.run_interval(START, &"TEST".into()).await.unwrap();

    assert_eq!(summary.network.as_str(), "TEST");
    assert_eq!(summary.interval, common::interval());
    assert_eq!(summary.solver, "proportional");
    assert_eq!(summary.regions_processed, 2);
    assert_eq!(summary.records_written, 2);
    assert!(summary.low_confidence.is_empty());
    assert!(summary.dropped_regions.is_empty());
    assert!(summary.conservation_checked);

    let batches = engine.sink().batches();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];

    let a = &batch[0];
    assert_eq!(a.region.as_str(), "A");
    assert_eq!(a.energy_exports, 25.0);
    assert_eq!(a.emissions_exports, 20.0);
    assert_eq!(a.market_value_exports, 1000.0);
    assert_eq!(a.energy_imports, 0.0);

    let b = &batch[1];
    assert_eq!(b.region.as_str(), "B");
    assert_eq!(b.energy_imports, 25.0);
    assert_eq!(b.emissions_imports, 20.0);
    assert_eq!(b.market_value_imports, 1000.0);

    // demand follows from the persisted figures: A 100 - 25, B 50 + 25
    assert_relative_eq!(100.0 + a.energy_imports - a.energy_exports, 75.0);
    assert_relative_eq!(50.0 + b.energy_imports - b.energy_exports, 75.0);
}

#[rstest]
#[tokio::test]
async fn reruns_write_identical_batches(config: FlowConfig) {
    let reader = MemoryReader {
        generation: vec![
            reading("A_COAL", "A", 0.1, 0.93),
            reading("A_GAS", "A", 0.2, 0.51),
            reading("A_SOLAR", "A", 0.3, 0.0),
            reading("B_WIND", "B", 7.7, 0.0),
            reading("C_HYDRO", "C", 1.3, 0.0),
        ],
        flows: vec![
            flow("A", "B", 0.1),
            flow("B", "A", 0.3),
            flow("B", "C", 0.7),
            flow("C", "A", 1e-3),
        ],
        prices: vec![price("A", 31.7), price("B", -2.2), price("C", 104.9)],
        ..Default::default()
    };
    let mut shuffled = reader.clone();
    shuffled.generation.reverse();
    shuffled.flows.rotate_left(2);
    shuffled.prices.reverse();

    let engine = orchestrator(reader, MemorySink::default(), config.clone());
    engine.run_interval(START, &"TEST".into()).await.unwrap();
    engine.run_interval(START, &"TEST".into()).await.unwrap();

    let other = orchestrator(shuffled, MemorySink::default(), config);
    other.run_interval(START, &"TEST".into()).await.unwrap();

    let batches = engine.sink().batches();
    let bits = |batch: &Vec<gfa_core::models::FlowAllocationResult>| {
        batch
            .iter()
            .flat_map(|r| {
                [
                    r.energy_imports,
                    r.energy_exports,
                    r.emissions_imports,
                    r.emissions_exports,
                    r.market_value_imports,
                    r.market_value_exports,
                ]
            })
            .map(f64::to_bits)
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(&batches[0]), bits(&batches[1]));
    assert_eq!(bits(&batches[0]), bits(&other.sink().batches()[0]));
    assert_eq!(batches[0], other.sink().batches()[0]);
}

#[rstest]
#[tokio::test]
async fn the_tracing_strategy_can_be_selected(mut config: FlowConfig) {
    config.solver = SolverVersion::V2;
    let engine = orchestrator(example(), MemorySink::default(), config);

    let summary = engine.run_interval(START, &"TEST".into()).await.unwrap();
    assert_eq!(summary.solver, "tracing");
    assert_eq!(engine.sink().batches()[0][1].emissions_imports, 20.0);
}

#[rstest]
#[tokio::test]
async fn missing_generation_fails_while_loading(config: FlowConfig) {
    let reader = MemoryReader {
        generation: vec![],
        ..example()
    };
    let engine = orchestrator(reader, MemorySink::default(), config);

    let failure = engine.run_interval(START, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Loading);
    assert!(matches!(failure.error, FlowError::NoInputData("generation")));
    assert_eq!(failure.disposition(), Disposition::Retryable);
    assert!(engine.sink().batches().is_empty());
}

#[rstest]
#[tokio::test]
async fn missing_flows_fail_while_netting(config: FlowConfig) {
    let reader = MemoryReader {
        flows: vec![],
        ..example()
    };
    let engine = orchestrator(reader, MemorySink::default(), config);

    let failure = engine.run_interval(START, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Netting);
    assert!(matches!(failure.error, FlowError::NoInputData(_)));
    assert_eq!(failure.disposition(), Disposition::Retryable);
}

#[rstest]
#[tokio::test]
async fn unknown_regions_are_fatal(config: FlowConfig) {
    let mut reader = example();
    reader.flows.push(flow("A", "Z", 1.0));
    let engine = orchestrator(reader, MemorySink::default(), config);

    let failure = engine.run_interval(START, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Netting);
    assert!(matches!(
        &failure.error,
        FlowError::UnknownRegion { region, .. } if region.as_str() == "Z"
    ));
    assert_eq!(failure.disposition(), Disposition::Fatal);
}

#[rstest]
#[tokio::test]
async fn unknown_networks_are_fatal(config: FlowConfig) {
    let engine = orchestrator(example(), MemorySink::default(), config);

    let failure = engine.run_interval(START, &"WEM".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Loading);
    assert_eq!(failure.network.as_str(), "WEM");
    assert!(matches!(failure.error, FlowError::UnknownNetwork(_)));
    assert_eq!(failure.disposition(), Disposition::Fatal);
}

#[rstest]
#[tokio::test]
async fn misaligned_starts_are_malformed(config: FlowConfig) {
    let engine = orchestrator(example(), MemorySink::default(), config);

    let start = START + time::Duration::minutes(17);
    let failure = engine.run_interval(start, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.start, start);
    assert!(matches!(failure.error, FlowError::MalformedInput(_)));
    assert_eq!(failure.disposition(), Disposition::Fatal);
}

#[rstest]
#[tokio::test]
async fn reader_errors_are_retryable(config: FlowConfig) {
    let reader = MemoryReader {
        behaviour: Behaviour::Fail,
        ..example()
    };
    let engine = orchestrator(reader, MemorySink::default(), config);

    let failure = engine.run_interval(START, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Loading);
    assert!(matches!(failure.error, FlowError::ReaderFailure { .. }));
    assert_eq!(failure.disposition(), Disposition::Retryable);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn stalled_readers_time_out(config: FlowConfig) {
    let reader = MemoryReader {
        behaviour: Behaviour::Stall,
        ..example()
    };
    let engine = orchestrator(reader, MemorySink::default(), config);

    let failure = engine.run_interval(START, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Loading);
    assert!(matches!(
        failure.error,
        FlowError::Timeout { after, .. } if after == Duration::from_secs(30)
    ));
    assert_eq!(failure.disposition(), Disposition::Retryable);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn stalled_sinks_time_out(mut config: FlowConfig) {
    config.sink_timeout = Duration::from_secs(5);
    let engine = orchestrator(example(), MemorySink::with(Behaviour::Stall), config);

    let failure = engine.run_interval(START, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Persisting);
    assert!(matches!(
        failure.error,
        FlowError::Timeout {
            operation: "upsert",
            ..
        }
    ));
}

#[rstest]
#[case::failed(Behaviour::Fail)]
#[case::short(Behaviour::Short)]
#[tokio::test]
async fn sink_failures_are_retryable(#[case] behaviour: Behaviour, config: FlowConfig) {
    let engine = orchestrator(example(), MemorySink::with(behaviour), config);

    let failure = engine.run_interval(START, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Persisting);
    assert_eq!(failure.disposition(), Disposition::Retryable);
    match behaviour {
        Behaviour::Fail => assert!(matches!(failure.error, FlowError::PersistenceFailure(_))),
        _ => assert!(matches!(
            failure.error,
            FlowError::PartialWrite {
                written: 1,
                expected: 2
            }
        )),
    }
}

fn overflowing() -> MemoryReader {
    MemoryReader {
        generation: vec![
            reading("A_COAL", "A", 1e308, 1e308),
            reading("B_GAS", "B", 50.0, 0.2),
        ],
        ..example()
    }
}

#[rstest]
#[tokio::test]
async fn strict_conservation_failures_are_fatal(config: FlowConfig) {
    let engine = orchestrator(overflowing(), MemorySink::default(), config);

    let failure = engine.run_interval(START, &"TEST".into()).await.unwrap_err();
    assert_eq!(failure.stage, Stage::Merging);
    assert!(matches!(
        failure.error,
        FlowError::ConservationViolation {
            quantity: "emissions",
            ..
        }
    ));
    assert_eq!(failure.disposition(), Disposition::Fatal);
    assert!(engine.sink().batches().is_empty());
}

#[rstest]
#[tokio::test]
async fn lenient_conservation_failures_are_persisted(mut config: FlowConfig) {
    config.mode = ConservationMode::Lenient;
    let engine = orchestrator(overflowing(), MemorySink::default(), config);

    let summary = engine.run_interval(START, &"TEST".into()).await.unwrap();
    assert!(!summary.conservation_checked);
    assert_eq!(summary.records_written, 2);
}

#[rstest]
#[tokio::test]
async fn incomplete_regions_are_dropped_and_reported(config: FlowConfig) {
    // B has prices and flows but no generation telemetry
    let reader = MemoryReader {
        generation: vec![reading("A_COAL", "A", 100.0, 0.8)],
        ..example()
    };
    let engine = orchestrator(reader, MemorySink::default(), config);

    let summary = engine.run_interval(START, &"TEST".into()).await.unwrap();
    assert_eq!(summary.dropped_regions, vec![RegionId::from("B")]);
    assert_eq!(summary.regions_processed, 1);
    assert!(!summary.conservation_checked);
    assert_eq!(engine.sink().batches()[0][0].region.as_str(), "A");
}

#[rstest]
#[tokio::test]
async fn low_confidence_regions_are_reported(config: FlowConfig) {
    let reader = MemoryReader {
        prices: vec![price("B", 60.0)],
        ..example()
    };
    let engine = orchestrator(reader, MemorySink::default(), config);

    let summary = engine.run_interval(START, &"TEST".into()).await.unwrap();
    assert_eq!(
        summary.low_confidence,
        vec![RegionId::from("A"), RegionId::from("B")]
    );
    assert!(!summary.conservation_checked);

    let batch = &engine.sink().batches()[0];
    assert!(batch.iter().all(|record| record.low_confidence));
    assert_eq!(batch[0].market_value_exports, 0.0);
}

#[rstest]
#[tokio::test]
async fn distinct_intervals_run_concurrently(config: FlowConfig) {
    let mut reader = example();
    let next = hourly().interval_at(START + time::Duration::HOUR).unwrap();
    let later = reader
        .generation
        .iter()
        .cloned()
        .map(|mut r| {
            r.interval = next;
            r
        })
        .collect::<Vec<_>>();
    reader.generation.extend(later);
    reader.flows.push(gfa_core::models::InterconnectorFlow {
        interval: next,
        ..flow("B", "A", 10.0)
    });
    reader.prices.extend(
        [price("A", 1.0), price("B", 2.0)]
            .into_iter()
            .map(|p| gfa_core::models::RegionPrice { interval: next, ..p }),
    );
    let engine = orchestrator(reader, MemorySink::default(), config);

    let network = "TEST".into();
    let (first, second) = tokio::join!(
        engine.run_interval(START, &network),
        engine.run_interval(START + time::Duration::HOUR, &network),
    );
    assert_eq!(first.unwrap().records_written, 2);
    assert_eq!(second.unwrap().records_written, 2);
    assert_eq!(engine.sink().batches().len(), 2);
}
