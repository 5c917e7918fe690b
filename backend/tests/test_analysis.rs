//! Tests for batch analysis
//!
//! Runs real batches and checks the aggregate figures: Little's Law,
//! bottleneck detection, the cost model and the summary totals.

use assembly_line_core::{
    Analyzer, ReplicationRunner, SimulationConfig, SimulationError, StationConfig, Summary,
};

/// A stable three-stage line: no defects, no breakdowns, every station
/// well below saturation
fn stable_line() -> SimulationConfig {
    let mut config = SimulationConfig::new(
        vec![
            StationConfig::new("Cut", 1, 20.0, 3.0, 15.0).unwrap(),
            StationConfig::new("Weld", 1, 15.0, 2.0, 15.0).unwrap(),
            StationConfig::new("Paint", 2, 30.0, 4.0, 12.0).unwrap(),
        ],
        45.0,
        500,
        8 * 3600,
    );
    config.replications = 10;
    config.buffer_capacity = 50;
    config.base_seed = 42;
    config
}

fn analyze(config: SimulationConfig) -> Summary {
    ReplicationRunner::new(config)
        .unwrap()
        .run_and_analyze()
        .unwrap()
        .summary
}

#[test]
fn test_little_law_holds_on_stable_line() {
    let summary = analyze(stable_line());

    assert_eq!(summary.replicas, 10);
    assert_eq!(summary.truncated_replicas, 0);
    assert_eq!(summary.total_completed, 5000);
    assert!(
        summary.little_law.passes,
        "discrepancy {} min",
        summary.little_law_discrepancy
    );
    assert!(summary.little_law_discrepancy < 1.0);
    assert!((summary.little_law.expected_wip - summary.mean_avg_wip).abs() < 0.5);
}

#[test]
fn test_stable_line_headline_figures() {
    let summary = analyze(stable_line());

    // 500 items over 8 hours in every replica
    assert!((summary.mean_throughput - 62.5).abs() < 1e-9);
    assert_eq!(summary.throughput.std_dev, 0.0);

    // At least the sum of the mean service times
    assert!(summary.mean_cycle_time > 65.0 / 60.0);
    assert!(summary.cycle_time.min <= summary.cycle_time.mean);
    assert!(summary.cycle_time.mean <= summary.cycle_time.max);

    assert_eq!(summary.bottleneck_station, "Cut");
    assert!(summary.bottleneck.advice.is_none());
}

#[test]
fn test_laptop_line_bottleneck_is_final_test() {
    let summary = analyze(SimulationConfig::laptop_line());

    assert_eq!(summary.bottleneck_station, "Pruebas");
    assert!(summary.bottleneck.utilization_pct > 85.0);

    let advice = summary.bottleneck.advice.as_ref().unwrap();
    assert_eq!(advice.add_servers, 1);
    assert!((advice.service_time_reduction_secs - 6.0).abs() < 1e-9);
    assert!(
        (advice.add_servers_gain_pct - (100.0 - summary.bottleneck.utilization_pct) / 2.0).abs()
            < 1e-9
    );
}

#[test]
fn test_laptop_line_totals_and_defects() {
    let summary = analyze(SimulationConfig::laptop_line());

    assert_eq!(summary.total_scrapped, 0);
    assert!(summary.total_completed + summary.total_defective <= 5000);
    assert!(
        (summary.defect_rate_pct - 5.0).abs() < 1.5,
        "defect rate {}%",
        summary.defect_rate_pct
    );
    assert!(summary.max_wip as f64 >= summary.mean_avg_wip);
    assert_eq!(summary.stations.len(), 5);
}

#[test]
fn test_laptop_line_cost() {
    let summary = analyze(SimulationConfig::laptop_line());

    // (15 + 15 + 15 + 12×2 + 20) per hour × 8 h × 10 replicas
    assert!((summary.total_cost - 7120.0).abs() < 1e-9);
    assert_eq!(summary.costs.machine_hours, 80.0);
    assert!(
        (summary.cost_per_unit - summary.total_cost / summary.total_completed as f64).abs() < 1e-9
    );
}

#[test]
fn test_single_replica_summary() {
    let mut config = stable_line();
    config.replications = 1;
    let summary = analyze(config);

    assert_eq!(summary.throughput.std_dev, 0.0);
    assert_eq!(summary.cycle_time.std_dev, 0.0);
    assert_eq!(summary.cycle_time.min, summary.cycle_time.max);
}

#[test]
fn test_nothing_completed_costs_zero_per_unit() {
    let mut config = stable_line();
    config.replications = 2;
    config.defect_rate = 1.0;
    let summary = analyze(config);

    assert_eq!(summary.total_completed, 0);
    assert_eq!(summary.cost_per_unit, 0.0);
    assert_eq!(summary.mean_throughput, 0.0);
    assert_eq!(summary.little_law.implied_cycle_time_minutes, 0.0);
    assert_eq!(summary.defect_rate_pct, 100.0);
}

#[test]
fn test_empty_results_are_an_error() {
    let analyzer = Analyzer::new(&stable_line());
    assert_eq!(analyzer.analyze(&[]), Err(SimulationError::NoResults));
}

#[test]
fn test_summary_serializes_headline_fields() {
    let mut config = stable_line();
    config.replications = 2;
    let summary = analyze(config);

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["bottleneck_station"], "Cut");
    assert_eq!(value["replicas"], 2);
    for field in [
        "mean_throughput",
        "mean_cycle_time",
        "little_law_discrepancy",
        "total_cost",
        "cost_per_unit",
    ] {
        assert!(value[field].is_number(), "missing {}", field);
    }
}
