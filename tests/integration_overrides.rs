//! Integration tests for per-hour overrides from imported CSV data.

mod common;

use std::path::Path;

use common::{basic_params, demand_row};
use ev_solar_sim::config::ScenarioConfig;
use ev_solar_sim::io::import::{load_overrides, read_overrides};
use ev_solar_sim::sim::engine::run_simulation;
use ev_solar_sim::sim::overrides::OverrideRow;
use ev_solar_sim::sim::types::SimulationParameters;

#[test]
fn site_file_rows_apply_by_position() {
    let imported = load_overrides(Path::new("scenarios/data/site_overrides.csv")).unwrap();
    assert_eq!(imported.rows.len(), 8);
    assert_eq!(imported.malformed.len(), 1);
    assert_eq!(imported.malformed[0].row, 7);

    let params = SimulationParameters {
        overrides: imported.rows,
        ..basic_params()
    };
    let result = run_simulation(&params).unwrap();
    let h = &result.hourly_data;

    // overridden demand, battery covers it
    assert_eq!(h[0].ev_demand_kw, 22.5);
    assert_eq!(h[0].battery_kw, -22.5);
    assert_eq!(h[0].soc_pct, 68.8);

    // empty and malformed demand cells fall back to the model
    assert_eq!(h[3].ev_demand_kw, 40.0);
    assert_eq!(h[7].ev_demand_kw, 40.0);

    // 35 W/m² at 10 °C and 20 % cloud: 0.035 * 100 * 0.2 * 1.06 * 0.86
    assert_eq!(h[4].solar_kw, 0.64);

    // past the last row everything is modeled again
    assert_eq!(h[12].solar_kw, 13.76);
    assert_eq!(h[12].ev_demand_kw, 60.0);
}

#[test]
fn overridden_irradiance_is_not_diurnally_shaped() {
    let csv = "GHI\n1000\n";
    let params = SimulationParameters {
        overrides: read_overrides(csv.as_bytes()).unwrap().rows,
        duration_hours: 2,
        ..basic_params()
    };
    let result = run_simulation(&params).unwrap();
    // hour 0 is dark without the override; 1.0 * 100 kW * 0.172
    assert_eq!(result.hourly_data[0].solar_kw, 17.2);
}

#[test]
fn irradiance_columns_resolve_last_present() {
    let csv = "irradiance,solar_irradiance,GHI\n100,200,\n100,,\n";
    let rows = read_overrides(csv.as_bytes()).unwrap().rows;
    assert_eq!(rows[0].irradiance_w_m2(), Some(200.0));
    assert_eq!(rows[1].irradiance_w_m2(), Some(100.0));
}

#[test]
fn demand_columns_resolve_first_present() {
    let csv = "consumption,demand,ev_demand\n30,20,10\n30,20,\n";
    let rows = read_overrides(csv.as_bytes()).unwrap().rows;
    assert_eq!(rows[0].demand_kw(), Some(10.0));
    assert_eq!(rows[1].demand_kw(), Some(20.0));
}

#[test]
fn zero_demand_override_means_no_demand() {
    let params = SimulationParameters {
        overrides: vec![demand_row(0.0)],
        duration_hours: 1,
        ..basic_params()
    };
    let result = run_simulation(&params).unwrap();
    let h0 = &result.hourly_data[0];
    assert_eq!(h0.ev_demand_kw, 0.0);
    // solar 0 >= demand 0 counts as surplus
    assert_eq!(h0.efficiency_pct, 90.0);
    assert_eq!(result.final_battery_soc, 80.0);
    assert_eq!(result.total_energy_consumed, 0.0);
}

#[test]
fn empty_rows_change_nothing() {
    let plain = run_simulation(&basic_params()).unwrap();
    let padded = run_simulation(&SimulationParameters {
        overrides: vec![OverrideRow::default(); 30],
        ..basic_params()
    })
    .unwrap();
    assert_eq!(plain, padded);
}

#[test]
fn scenario_file_names_its_override_csv() {
    let cfg = ScenarioConfig::from_toml_file(Path::new("scenarios/site_overrides.toml")).unwrap();
    let path = cfg.simulation.overrides.clone().unwrap();
    let rows = load_overrides(&path).unwrap().rows;
    let result = run_simulation(&cfg.to_parameters(rows)).unwrap();
    assert_eq!(result.hourly_data[0].ev_demand_kw, 22.5);
}
