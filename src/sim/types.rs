//! Core simulation types: run parameters, per-hour controller contracts, and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::overrides::OverrideRow;
use crate::error::SimError;

/// Longest accepted run: one year of hourly steps.
pub const MAX_DURATION_HOURS: usize = 8760;

/// Period of the diurnal half-sine used to shape base irradiance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiurnalPeriod {
    /// `sin(π · hour / 24)` regardless of run length.
    #[default]
    Fixed24,
    /// `sin(π · hour / duration)`, one daylight arc stretched over the whole run.
    Duration,
}

/// Inputs for one simulation run.
///
/// Constructed per invocation and never mutated by the engine. Check with
/// [`SimulationParameters::validate`] (the engine does so before the first hour).
///
/// # Examples
///
/// ```
/// use ev_solar_sim::sim::types::SimulationParameters;
///
/// let params = SimulationParameters::default();
/// assert_eq!(params.duration_hours, 24);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Base solar irradiance (W/m², >= 0).
    pub solar_irradiance_w_m2: f64,
    /// Ambient temperature (°C).
    pub temperature_c: f64,
    /// Cloud cover (%, 0–100).
    pub cloud_cover_pct: f64,
    /// Wind speed (m/s). Recorded only, dispatch ignores it.
    pub wind_speed_m_s: f64,
    /// Installed PV capacity (kW, >= 0).
    pub panel_capacity_kw: f64,
    /// Battery energy capacity (kWh, > 0).
    pub battery_capacity_kwh: f64,
    /// Battery state of charge at hour 0 (%, 0–100).
    pub initial_soc_pct: f64,
    /// Number of installed chargers. Informational.
    pub ev_chargers: u32,
    /// Base EV charging demand (kW, >= 0).
    pub ev_demand_kw: f64,
    /// Whether the station can import from the grid.
    pub grid_connected: bool,
    /// Selects the optimized dispatch heuristic instead of the basic one.
    pub ml_optimization: bool,
    /// Number of hours to simulate (1 to [`MAX_DURATION_HOURS`]).
    pub duration_hours: usize,
    /// Diurnal irradiance shape period.
    pub diurnal_period: DiurnalPeriod,
    /// Per-hour overrides; row `i` applies to hour `i`, hours past the end use the models.
    pub overrides: Vec<OverrideRow>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            solar_irradiance_w_m2: 800.0,
            temperature_c: 25.0,
            cloud_cover_pct: 20.0,
            wind_speed_m_s: 5.0,
            panel_capacity_kw: 100.0,
            battery_capacity_kwh: 200.0,
            initial_soc_pct: 80.0,
            ev_chargers: 4,
            ev_demand_kw: 50.0,
            grid_connected: true,
            ml_optimization: true,
            duration_hours: 24,
            diurnal_period: DiurnalPeriod::Fixed24,
            overrides: Vec::new(),
        }
    }
}

impl SimulationParameters {
    /// Returns every constraint violation as an `InvalidParameter` error.
    ///
    /// Returns an empty vector if the parameters are valid.
    pub fn violations(&self) -> Vec<SimError> {
        let mut errors = Vec::new();
        let mut push = |field: &'static str, message: &str| {
            errors.push(SimError::InvalidParameter {
                field,
                message: message.to_string(),
            });
        };

        let numeric = [
            ("solar_irradiance_w_m2", self.solar_irradiance_w_m2),
            ("temperature_c", self.temperature_c),
            ("cloud_cover_pct", self.cloud_cover_pct),
            ("wind_speed_m_s", self.wind_speed_m_s),
            ("panel_capacity_kw", self.panel_capacity_kw),
            ("battery_capacity_kwh", self.battery_capacity_kwh),
            ("initial_soc_pct", self.initial_soc_pct),
            ("ev_demand_kw", self.ev_demand_kw),
        ];
        for (field, value) in numeric {
            if !value.is_finite() {
                push(field, "must be a finite number");
            }
        }

        if self.solar_irradiance_w_m2 < 0.0 {
            push("solar_irradiance_w_m2", "must be >= 0");
        }
        if !(0.0..=100.0).contains(&self.cloud_cover_pct) && self.cloud_cover_pct.is_finite() {
            push("cloud_cover_pct", "must be in [0, 100]");
        }
        if self.panel_capacity_kw < 0.0 {
            push("panel_capacity_kw", "must be >= 0");
        }
        if self.battery_capacity_kwh <= 0.0 {
            push("battery_capacity_kwh", "must be > 0");
        }
        if !(0.0..=100.0).contains(&self.initial_soc_pct) && self.initial_soc_pct.is_finite() {
            push("initial_soc_pct", "must be in [0, 100]");
        }
        if self.ev_demand_kw < 0.0 {
            push("ev_demand_kw", "must be >= 0");
        }
        if self.duration_hours == 0 {
            push("duration_hours", "must be > 0");
        }
        if self.duration_hours > MAX_DURATION_HOURS {
            push("duration_hours", &format!("must be <= {MAX_DURATION_HOURS}"));
        }

        errors
    }

    /// Fails with the first constraint violation, if any.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` naming the offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        match self.violations().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Modeled readings and battery state for one hour, fed to the controller.
#[derive(Debug, Clone, Copy)]
pub struct StepInput {
    /// Hour index (0-based).
    pub hour: usize,
    /// Solar generation this hour (kW, >= 0 for valid inputs).
    pub solar_kw: f64,
    /// Requested EV charging demand this hour (kW).
    pub demand_kw: f64,
    /// Battery state of charge entering this hour (%).
    pub battery_soc_pct: f64,
    /// Battery capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Whether grid import is available.
    pub grid_connected: bool,
}

/// Controller decision for one hour.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepDispatch {
    /// Battery flow (kW; positive=charge, negative=discharge).
    pub battery_kw: f64,
    /// Grid import (kW, >= 0).
    pub grid_import_kw: f64,
    /// Dispatch efficiency figure for this hour (%).
    pub efficiency_pct: f64,
}

/// Complete record of one simulated hour, rounded for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Hour index (0-based).
    pub hour: usize,
    /// Solar generation (kW).
    #[serde(rename = "solar")]
    pub solar_kw: f64,
    /// Battery flow (kW; positive=charge, negative=discharge).
    #[serde(rename = "battery")]
    pub battery_kw: f64,
    /// Grid import (kW).
    #[serde(rename = "grid")]
    pub grid_import_kw: f64,
    /// Requested EV demand (kW).
    #[serde(rename = "ev")]
    pub ev_demand_kw: f64,
    /// Battery state of charge after this hour (%).
    #[serde(rename = "soc")]
    pub soc_pct: f64,
    /// Dispatch efficiency figure for this hour (%).
    #[serde(rename = "efficiency")]
    pub efficiency_pct: f64,
}

impl fmt::Display for HourlyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>3} | solar={:>7.2} kW  ev={:>7.2} kW | bat={:>8.2} kW (SoC={:>4.1}%) \
             grid={:>7.2} kW | eff={:.0}%",
            self.hour,
            self.solar_kw,
            self.ev_demand_kw,
            self.battery_kw,
            self.soc_pct,
            self.grid_import_kw,
            self.efficiency_pct,
        )
    }
}

/// Output of one simulation run.
///
/// Totals are in kWh (one-hour steps), efficiency in %, savings in dollars.
/// Serialized field names follow the camelCase result shape consumed by
/// dashboards and report exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub duration: usize,
    pub hourly_data: Vec<HourlyRecord>,
    pub total_solar_generation: f64,
    pub total_battery_discharge: f64,
    pub total_grid_import: f64,
    pub total_energy_consumed: f64,
    pub average_efficiency: f64,
    pub peak_solar_generation: f64,
    pub estimated_cost_savings: f64,
    #[serde(rename = "finalBatterySOC")]
    pub final_battery_soc: f64,
    #[serde(rename = "mlRecommendations")]
    pub recommendations: Vec<String>,
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Summary ({} h) ---", self.duration)?;
        writeln!(f, "Total solar generation:   {:.2} kWh", self.total_solar_generation)?;
        writeln!(f, "Total battery discharge:  {:.2} kWh", self.total_battery_discharge)?;
        writeln!(f, "Total grid import:        {:.2} kWh", self.total_grid_import)?;
        writeln!(f, "Total energy consumed:    {:.2} kWh", self.total_energy_consumed)?;
        writeln!(f, "Average efficiency:       {:.2}%", self.average_efficiency)?;
        writeln!(f, "Peak solar generation:    {:.2} kW", self.peak_solar_generation)?;
        writeln!(f, "Estimated cost savings:   {:.2} $", self.estimated_cost_savings)?;
        write!(f, "Final battery SoC:        {:.1}%", self.final_battery_soc)?;
        if !self.recommendations.is_empty() {
            writeln!(f)?;
            write!(f, "--- Recommendations ---")?;
            for r in &self.recommendations {
                writeln!(f)?;
                write!(f, "- {r}")?;
            }
        }
        Ok(())
    }
}

/// Rounds to two decimals, the precision of all reported kW/kWh/% fields.
pub fn round2(x: f64) -> f64 {
    round_scaled(x, 100.0)
}

/// Rounds to one decimal, the precision of reported SoC values.
pub fn round1(x: f64) -> f64 {
    round_scaled(x, 10.0)
}

/// Rounds the exact stored value of `x` to a multiple of `1 / scale`, ties away from zero.
///
/// `x * scale` can itself round onto a half-way point (15.805 is stored as
/// 15.80499..., yet `15.805 * 100.0 == 1580.5`). In that case the residual of the
/// multiply, recovered exactly with a fused multiply-add, says which side of the
/// half the stored value lies on.
fn round_scaled(x: f64, scale: f64) -> f64 {
    let scaled = x * scale;
    let mut n = scaled.round();
    if (scaled - scaled.trunc()).abs() == 0.5 {
        let residual = x.mul_add(scale, -scaled);
        if residual * scaled.signum() < 0.0 {
            n = scaled.trunc();
        }
    }
    n / scale
}
