//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use ev_solar_sim::sim::overrides::OverrideRow;
use ev_solar_sim::sim::types::{SimulationParameters, SimulationResult};

/// Default station (800 W/m², 100 kW PV, 200 kWh at 80 %, 50 kW demand) with basic dispatch.
pub fn basic_params() -> SimulationParameters {
    SimulationParameters {
        ml_optimization: false,
        ..SimulationParameters::default()
    }
}

/// Default station with the optimized dispatch heuristic.
pub fn optimized_params() -> SimulationParameters {
    SimulationParameters::default()
}

/// `params` without a grid tie.
pub fn islanded(params: SimulationParameters) -> SimulationParameters {
    SimulationParameters {
        grid_connected: false,
        ..params
    }
}

/// Override row that sets only the EV demand.
pub fn demand_row(kw: f64) -> OverrideRow {
    OverrideRow {
        ev_demand: Some(kw),
        ..OverrideRow::default()
    }
}

/// Asserts that every reported SoC stays inside the 10–95 % window.
pub fn assert_soc_window(result: &SimulationResult) {
    for r in &result.hourly_data {
        assert!(
            (10.0..=95.0).contains(&r.soc_pct),
            "hour {} SoC {} outside [10, 95]",
            r.hour,
            r.soc_pct
        );
    }
}

/// Asserts `a` and `b` agree to within one reported cent/hundredth.
pub fn assert_close(a: f64, b: f64, what: &str) {
    assert!((a - b).abs() <= 0.011, "{what}: expected {b}, got {a}");
}
