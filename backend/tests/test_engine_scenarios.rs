//! Tests for the replica engine on small, hand-checkable lines
//!
//! Each scenario is small enough to trace tick by tick, so the expected
//! figures below are exact.

use assembly_line_core::{
    BufferPolicy, Event, ReplicaEngine, SimulationConfig, StationConfig,
};

fn press(mean: f64) -> StationConfig {
    StationConfig::new("Press", 1, mean, 0.0, 12.0).unwrap()
}

fn single_station(station: StationConfig, interval: f64, arrivals: u32, horizon: u64) -> SimulationConfig {
    SimulationConfig::new(vec![station], interval, arrivals, horizon)
}

fn waits(engine: &ReplicaEngine) -> Vec<u64> {
    engine
        .event_log()
        .events_of_type("ServiceStart")
        .into_iter()
        .map(|event| match event {
            Event::ServiceStart { wait, .. } => *wait,
            _ => unreachable!(),
        })
        .collect()
}

// ============================================================================
// Scenario A: arrivals slower than service
// ============================================================================

#[test]
fn test_slow_arrivals_never_queue() {
    let config = single_station(press(10.0), 20.0, 5, 200);
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    let result = engine.run();

    assert_eq!(result.admitted, 5);
    assert_eq!(result.completed, 5);
    assert_eq!(result.defective, 0);
    assert_eq!(result.final_wip, 0);
    assert!(!result.truncated);
    assert_eq!(result.end_time, 200);

    assert_eq!(waits(&engine), vec![0, 0, 0, 0, 0]);

    let station = result.station("Press").unwrap();
    assert_eq!(station.processed, 5);
    assert_eq!(station.avg_wait_minutes, 0.0);
    // 50 busy seconds over the 200 second horizon
    assert!((station.utilization_pct - 25.0).abs() < 1e-9);

    assert!((result.throughput_per_hour - 90.0).abs() < 1e-9);
    assert!((result.avg_cycle_time_minutes - 10.0 / 60.0).abs() < 1e-9);
}

#[test]
fn test_slow_arrivals_timeline() {
    let config = single_station(press(10.0), 20.0, 5, 200);
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    engine.run();

    let arrivals: Vec<u64> = engine
        .event_log()
        .events_of_type("Arrival")
        .iter()
        .map(|e| e.tick())
        .collect();
    let completions: Vec<u64> = engine
        .event_log()
        .events_of_type("Completed")
        .iter()
        .map(|e| e.tick())
        .collect();

    assert_eq!(arrivals, vec![20, 40, 60, 80, 100]);
    assert_eq!(completions, vec![30, 50, 70, 90, 110]);
}

#[test]
fn test_wip_samples_match_timeline() {
    let config = single_station(press(10.0), 20.0, 5, 200);
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    let result = engine.run();

    // Samples at t = 0, 60, 120, 180; only the t = 60 arrival is in service
    assert_eq!(engine.line().wip_samples(), &[0, 1, 0, 0]);
    assert_eq!(result.max_wip, 1);
    assert_eq!(result.avg_wip, 0.25);
}

// ============================================================================
// Scenario B: arrivals faster than service
// ============================================================================

#[test]
fn test_fast_arrivals_build_a_queue() {
    let config = single_station(press(10.0), 5.0, 5, 200);
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    let result = engine.run();

    assert_eq!(result.completed, 5);
    assert_eq!(waits(&engine), vec![0, 5, 10, 15, 20]);

    let station = result.station("Press").unwrap();
    assert!((station.avg_wait_minutes - 10.0 / 60.0).abs() < 1e-9);

    // Cycle times 10, 15, 20, 25, 30 seconds
    assert!((result.avg_cycle_time_minutes - 20.0 / 60.0).abs() < 1e-9);
}

#[test]
fn test_fast_arrivals_keep_station_busy() {
    let config = single_station(press(10.0), 5.0, 5, 200);
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    engine.run();

    // Starts back to back from the first arrival until the queue empties
    let starts: Vec<u64> = engine
        .event_log()
        .events_of_type("ServiceStart")
        .iter()
        .map(|e| e.tick())
        .collect();
    assert_eq!(starts, vec![5, 15, 25, 35, 45]);
    assert_eq!(engine.line().stations()[0].busy_time(), 50.0);
}

// ============================================================================
// Scenario C: a station that always breaks down
// ============================================================================

#[test]
fn test_always_failing_station_truncates() {
    let station = press(10.0).with_failures(1.0, 30.0).unwrap();
    let config = single_station(station, 20.0, 5, 200);
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    let result = engine.run();

    assert!(result.truncated);
    assert!(engine.is_truncated());
    assert_eq!(result.end_time, 401);
    assert_eq!(result.completed, 0);
    assert_eq!(result.admitted, 5);
    assert_eq!(result.final_wip, 5);
    assert!(result.is_conserved());

    let station = result.station("Press").unwrap();
    assert_eq!(station.processed, 0);
    assert!(station.failures > 0);
    assert_eq!(station.downtime_secs, station.failures as f64 * 30.0);

    let truncations = engine.event_log().events_of_type("Truncated");
    assert_eq!(truncations.len(), 1);
    assert_eq!(truncations[0], &Event::Truncated { tick: 401, wip: 5 });
}

#[test]
fn test_failed_station_starves_downstream() {
    let config = SimulationConfig::new(
        vec![
            press(10.0).with_failures(1.0, 30.0).unwrap(),
            StationConfig::new("Pack", 1, 5.0, 0.0, 8.0).unwrap(),
        ],
        20.0,
        5,
        200,
    );
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    let result = engine.run();

    assert!(result.truncated);
    assert_eq!(result.station("Pack").unwrap().processed, 0);
    assert_eq!(result.station("Pack").unwrap().utilization_pct, 0.0);
}

#[test]
fn test_breakdowns_are_journaled_with_repairs() {
    let station = press(10.0).with_failures(1.0, 30.0).unwrap();
    let config = single_station(station, 20.0, 1, 100);
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    engine.run();

    let log = engine.event_log();
    let failures = log.events_of_type("StationFailure");
    let repairs = log.events_of_type("StationRepaired");

    assert_eq!(failures[0].tick(), 20);
    assert_eq!(repairs[0].tick(), 50);
    // Every failure after the first follows a repair at the same tick
    assert_eq!(failures[1].tick(), 50);
    assert!(failures.iter().all(|e| e.item_id() == Some(1)));
}

// ============================================================================
// Drain phase and buffer policy
// ============================================================================

#[test]
fn test_arrivals_continue_while_draining() {
    let config = single_station(press(60.0), 50.0, 5, 200);
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    let result = engine.run();

    // Arrivals at 50..250; the line is still busy when the horizon passes
    assert_eq!(result.admitted, 5);
    assert_eq!(result.completed, 5);
    assert!(!result.truncated);
    assert_eq!(result.end_time, 351);
    assert!(engine.event_log().events_for_item(5)[0].tick() > 200);
}

#[test]
fn test_zero_buffer_under_backpressure_truncates() {
    let mut config = SimulationConfig::new(
        vec![press(5.0), StationConfig::new("Pack", 1, 5.0, 0.0, 8.0).unwrap()],
        20.0,
        3,
        100,
    );
    config.buffer_capacity = 0;
    config.buffer_policy = BufferPolicy::Backpressure;

    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    let result = engine.run();

    assert!(result.truncated);
    assert_eq!(result.station("Press").unwrap().processed, 0);
    assert!(engine.event_log().events_of_type("ServiceStart").is_empty());
}

#[test]
fn test_single_station_line_ignores_buffer() {
    let mut config = single_station(press(10.0), 20.0, 5, 200);
    config.buffer_capacity = 0;

    let result = ReplicaEngine::new(&config, 0).unwrap().run();
    assert_eq!(result.completed, 5);
    assert!(!result.truncated);
}

#[test]
fn test_defects_counted_separately() {
    let mut config = single_station(press(10.0), 20.0, 5, 200);
    config.defect_rate = 1.0;

    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    let result = engine.run();

    assert_eq!(result.completed, 0);
    assert_eq!(result.defective, 5);
    assert_eq!(result.throughput_per_hour, 0.0);
    assert_eq!(result.avg_cycle_time_minutes, 0.0);
    assert_eq!(engine.event_log().events_of_type("Defective").len(), 5);
}

// ============================================================================
// Ordering and determinism
// ============================================================================

#[test]
fn test_first_station_serves_in_arrival_order() {
    let config = SimulationConfig::laptop_line();
    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    engine.run();

    let started: Vec<u64> = engine
        .event_log()
        .events_for_station("Motherboard")
        .into_iter()
        .filter_map(|event| match event {
            Event::ServiceStart { item_id, .. } => Some(*item_id),
            _ => None,
        })
        .collect();

    assert_eq!(started.len(), 500);
    assert!(started.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_same_replica_replays_identically() {
    let config = SimulationConfig::laptop_line();

    let mut first = ReplicaEngine::new(&config, 3).unwrap();
    let mut second = ReplicaEngine::new(&config, 3).unwrap();

    assert_eq!(first.run(), second.run());
    assert_eq!(first.event_log().events(), second.event_log().events());
}

#[test]
fn test_different_replicas_differ() {
    let config = SimulationConfig::laptop_line();

    let a = ReplicaEngine::new(&config, 0).unwrap().run();
    let b = ReplicaEngine::new(&config, 1).unwrap().run();

    assert_ne!(a.seed, b.seed);
    assert_ne!(a.avg_cycle_time_minutes, b.avg_cycle_time_minutes);
}

#[test]
fn test_capacity_respected_every_tick() {
    let mut config = SimulationConfig::laptop_line();
    config.horizon_secs = 2 * 3600;
    config.total_arrivals = 150;

    let mut engine = ReplicaEngine::new(&config, 0).unwrap();
    while !engine.is_drained() && engine.current_time() <= 4 * 3600 {
        engine.tick();
        for station in engine.line().stations() {
            assert!(station.in_process_len() <= station.config().capacity() as usize);
        }
        assert!(engine.line().is_reconciled());
        assert!(engine.line().buffer_len() <= config.buffer_capacity);
    }
}
