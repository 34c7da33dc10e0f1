//! Instantaneous operating estimate at nameplate conditions.
//!
//! Unlike the hourly engine this ignores the diurnal shape and overrides: it
//! answers "what would the station do right now, at the configured irradiance
//! and SoC", including per-component conversion efficiencies.

use std::fmt;

use serde::Serialize;

use crate::devices::SolarArray;

use super::types::{SimulationParameters, round1};

/// Converter losses and energy balance for a single operating point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatingSnapshot {
    /// PV output before converter losses (kW).
    pub solar_kw: f64,
    /// EV charging demand (kW).
    pub ev_demand_kw: f64,
    /// Battery flow (kW; positive=charge, negative=discharge).
    pub battery_kw: f64,
    /// Grid import (kW).
    pub grid_kw: f64,
    /// Share of demand matched by PV output (%, capped at 100).
    pub self_sufficiency_pct: f64,
    /// MPPT tracker efficiency (%).
    pub mppt_efficiency_pct: f64,
    /// Battery DC/DC converter efficiency (%).
    pub dc_dc_efficiency_pct: f64,
    /// Inverter efficiency at the current load (%).
    pub inverter_efficiency_pct: f64,
}

/// Fraction of battery capacity deliverable or absorbable at once.
const BALANCE_POWER_FRACTION: f64 = 0.5;

impl OperatingSnapshot {
    /// Computes the snapshot for the configured irradiance, temperature, SoC, and demand.
    pub fn compute(params: &SimulationParameters) -> Self {
        let array = SolarArray::from_parameters(params);
        let solar_kw =
            (params.solar_irradiance_w_m2 / 1000.0) * params.panel_capacity_kw * array.efficiency_at(None);
        let ev_demand_kw = params.ev_demand_kw;

        let mppt_efficiency_pct = mppt_efficiency_pct(params.solar_irradiance_w_m2, params.temperature_c);
        let dc_dc_efficiency_pct = dc_dc_efficiency_pct(params.initial_soc_pct);
        let inverter_efficiency_pct = inverter_efficiency_pct(ev_demand_kw, params.panel_capacity_kw);

        let usable_kw = solar_kw * (mppt_efficiency_pct / 100.0);
        let (battery_kw, grid_kw) = balance_kw(
            usable_kw,
            ev_demand_kw,
            params.initial_soc_pct,
            params.battery_capacity_kwh,
            params.grid_connected,
        );

        let self_sufficiency_pct = if ev_demand_kw == 0.0 {
            100.0
        } else {
            (solar_kw / ev_demand_kw * 100.0).min(100.0)
        };

        Self {
            solar_kw,
            ev_demand_kw,
            battery_kw,
            grid_kw,
            self_sufficiency_pct,
            mppt_efficiency_pct,
            dc_dc_efficiency_pct,
            inverter_efficiency_pct,
        }
    }
}

/// MPPT efficiency: best at high irradiance, derated above 25 °C.
pub fn mppt_efficiency_pct(irradiance_w_m2: f64, temperature_c: f64) -> f64 {
    let irradiance_factor = (irradiance_w_m2 / 1000.0).min(1.0);
    let temp_factor = 1.0 - (temperature_c - 25.0).max(0.0) * 0.001;
    round1((98.5 * irradiance_factor * temp_factor).clamp(92.0, 99.2))
}

/// DC/DC efficiency: peaks at 65 % SoC.
pub fn dc_dc_efficiency_pct(soc_pct: f64) -> f64 {
    let soc_factor = 1.0 - (soc_pct - 65.0).abs() * 0.0008;
    round1((97.2 * soc_factor).clamp(90.0, 98.5))
}

/// Inverter efficiency: flat between 20 % and 80 % load, penalized outside.
pub fn inverter_efficiency_pct(load_kw: f64, rated_kw: f64) -> f64 {
    let load_factor = load_kw / rated_kw;
    let efficiency = if load_factor < 0.2 {
        92.0 + (load_factor / 0.2) * 4.8
    } else if load_factor > 0.8 {
        96.8 - ((load_factor - 0.8) / 0.2) * 2.8
    } else {
        96.8
    };
    round1(efficiency.clamp(88.0, 97.5))
}

/// Splits the PV/demand mismatch between battery and grid.
///
/// Returns `(battery_kw, grid_kw)`.
fn balance_kw(
    solar_kw: f64,
    demand_kw: f64,
    soc_pct: f64,
    capacity_kwh: f64,
    grid_connected: bool,
) -> (f64, f64) {
    let max_kw = capacity_kwh * BALANCE_POWER_FRACTION;
    if solar_kw > demand_kw {
        let excess = solar_kw - demand_kw;
        let battery_kw = if soc_pct < 95.0 { excess.min(max_kw) } else { 0.0 };
        (battery_kw, 0.0)
    } else if solar_kw < demand_kw {
        let deficit = demand_kw - solar_kw;
        if soc_pct > 20.0 {
            let from_battery = deficit.min(max_kw);
            let remaining = deficit - from_battery;
            let grid_kw = if remaining > 0.0 && grid_connected { remaining } else { 0.0 };
            (-from_battery, grid_kw)
        } else if grid_connected {
            (0.0, deficit)
        } else {
            (0.0, 0.0)
        }
    } else {
        (0.0, 0.0)
    }
}

impl fmt::Display for OperatingSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Operating Snapshot ---")?;
        writeln!(f, "Solar generation:    {:.2} kW", self.solar_kw)?;
        writeln!(f, "EV charging:         {:.2} kW", self.ev_demand_kw)?;
        writeln!(f, "Battery flow:        {:.2} kW", self.battery_kw)?;
        writeln!(f, "Grid power:          {:.2} kW", self.grid_kw)?;
        writeln!(f, "Self-sufficiency:    {:.1}%", self.self_sufficiency_pct)?;
        writeln!(f, "MPPT efficiency:     {:.1}%", self.mppt_efficiency_pct)?;
        writeln!(f, "DC/DC efficiency:    {:.1}%", self.dc_dc_efficiency_pct)?;
        write!(f, "Inverter efficiency: {:.1}%", self.inverter_efficiency_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_station_snapshot() {
        let s = OperatingSnapshot::compute(&SimulationParameters::default());
        // 0.8 * 100 * 0.172
        assert!((s.solar_kw - 13.76).abs() < 1e-9);
        assert_eq!(s.mppt_efficiency_pct, 92.0);
        // 97.2 * (1 - 15 * 0.0008)
        assert_eq!(s.dc_dc_efficiency_pct, 96.0);
        assert_eq!(s.inverter_efficiency_pct, 96.8);
        // deficit 50 - 13.76*0.92, battery covers up to 100 kW
        assert!((s.battery_kw + (50.0 - 13.76 * 0.92)).abs() < 1e-9);
        assert_eq!(s.grid_kw, 0.0);
        assert!((s.self_sufficiency_pct - 27.52).abs() < 1e-9);
    }

    #[test]
    fn mppt_clamped_to_band() {
        assert_eq!(mppt_efficiency_pct(1200.0, 25.0), 98.5);
        assert_eq!(mppt_efficiency_pct(100.0, 25.0), 92.0);
        assert_eq!(mppt_efficiency_pct(1000.0, 45.0), 96.5);
    }

    #[test]
    fn dc_dc_peaks_at_65_pct() {
        assert_eq!(dc_dc_efficiency_pct(65.0), 97.2);
        assert!(dc_dc_efficiency_pct(10.0) < dc_dc_efficiency_pct(50.0));
    }

    #[test]
    fn inverter_load_penalties() {
        assert_eq!(inverter_efficiency_pct(0.0, 100.0), 92.0);
        assert_eq!(inverter_efficiency_pct(10.0, 100.0), 94.4);
        assert_eq!(inverter_efficiency_pct(50.0, 100.0), 96.8);
        assert_eq!(inverter_efficiency_pct(100.0, 100.0), 94.0);
        assert_eq!(inverter_efficiency_pct(500.0, 100.0), 88.0);
    }

    #[test]
    fn surplus_charges_and_low_soc_imports() {
        assert_eq!(balance_kw(30.0, 10.0, 50.0, 200.0, true), (20.0, 0.0));
        assert_eq!(balance_kw(30.0, 10.0, 96.0, 200.0, true), (0.0, 0.0));
        assert_eq!(balance_kw(0.0, 40.0, 15.0, 200.0, true), (0.0, 40.0));
        assert_eq!(balance_kw(0.0, 40.0, 15.0, 200.0, false), (0.0, 0.0));
        assert_eq!(balance_kw(0.0, 40.0, 50.0, 20.0, true), (-10.0, 30.0));
    }

    #[test]
    fn zero_demand_is_fully_self_sufficient() {
        let params = SimulationParameters {
            ev_demand_kw: 0.0,
            ..SimulationParameters::default()
        };
        assert_eq!(OperatingSnapshot::compute(&params).self_sufficiency_pct, 100.0);
    }
}
