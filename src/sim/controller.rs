//! Hourly dispatch controllers deciding battery flow and grid import.

use serde::{Deserialize, Serialize};

use super::types::{StepDispatch, StepInput};

/// Per-hour dispatch policy.
///
/// Implementations may leave part of a deficit uncovered (low SoC with no
/// grid tie) or let surplus go unstored; the engine records both silently.
pub trait Controller {
    /// Decides battery flow, grid import, and the hour's efficiency figure.
    fn dispatch(&self, input: &StepInput) -> StepDispatch;
}

/// Rule-based dispatch: charge on surplus, discharge then import on deficit.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicController;

impl BasicController {
    /// Surplus fraction that reaches the battery.
    pub const CHARGE_EFFICIENCY: f64 = 0.90;
    /// No charging at or above this SoC (%).
    pub const CHARGE_CEILING_PCT: f64 = 95.0;
    /// No discharging at or below this SoC (%).
    pub const DISCHARGE_FLOOR_PCT: f64 = 20.0;
    /// Fraction of stored energy deliverable in one hour.
    pub const DISCHARGE_FRACTION: f64 = 0.25;
}

impl Controller for BasicController {
    fn dispatch(&self, input: &StepInput) -> StepDispatch {
        let mut out = StepDispatch::default();

        if input.solar_kw >= input.demand_kw {
            out.efficiency_pct = 90.0;
            if input.battery_soc_pct < Self::CHARGE_CEILING_PCT {
                out.battery_kw = (input.solar_kw - input.demand_kw) * Self::CHARGE_EFFICIENCY;
            }
            return out;
        }

        let deficit = input.demand_kw - input.solar_kw;
        if input.battery_soc_pct > Self::DISCHARGE_FLOOR_PCT {
            let available = stored_kwh(input) * Self::DISCHARGE_FRACTION;
            out.battery_kw = -deficit.min(available);
            out.efficiency_pct = 85.0;

            let remaining = deficit - out.battery_kw.abs();
            if remaining > 0.0 && input.grid_connected {
                out.grid_import_kw = remaining;
                out.efficiency_pct = 80.0;
            }
        } else if input.grid_connected {
            out.grid_import_kw = deficit;
            out.efficiency_pct = 70.0;
        }
        out
    }
}

/// Time-aware heuristic dispatch.
///
/// Charges only in daylight, holds the battery back during the peak demand
/// window (leaning on the grid instead), and falls back to a deeper battery
/// draw when islanded.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimizedController;

impl OptimizedController {
    /// Surplus fraction that reaches the battery.
    pub const CHARGE_EFFICIENCY: f64 = 0.92;
    /// No charging at or above this SoC (%).
    pub const CHARGE_CEILING_PCT: f64 = 90.0;
    /// Grid export would be considered above this SoC (%).
    pub const EXPORT_THRESHOLD_PCT: f64 = 80.0;
    /// Off-peak discharge only above this SoC (%).
    pub const DISCHARGE_FLOOR_PCT: f64 = 30.0;
    /// Off-peak fraction of stored energy deliverable in one hour.
    pub const DISCHARGE_FRACTION: f64 = 0.2;
    /// Islanded backup fraction of stored energy deliverable in one hour.
    pub const BACKUP_FRACTION: f64 = 0.3;

    /// `true` for hours 6 through 18.
    pub fn is_daytime(hour: usize) -> bool {
        (6..=18).contains(&hour)
    }

    /// `true` for hours 8 through 18.
    pub fn is_peak_demand(hour: usize) -> bool {
        (8..=18).contains(&hour)
    }
}

impl Controller for OptimizedController {
    fn dispatch(&self, input: &StepInput) -> StepDispatch {
        let mut out = StepDispatch::default();
        let soc = input.battery_soc_pct;

        if input.solar_kw >= input.demand_kw {
            out.efficiency_pct = 95.0;
            if soc < Self::CHARGE_CEILING_PCT && Self::is_daytime(input.hour) {
                out.battery_kw = (input.solar_kw - input.demand_kw) * Self::CHARGE_EFFICIENCY;
            }
            // Above the export threshold surplus would go to the grid; export
            // is not modeled, so both remaining cases leave the battery idle.
            return out;
        }

        let deficit = input.demand_kw - input.solar_kw;
        if soc > Self::DISCHARGE_FLOOR_PCT && !Self::is_peak_demand(input.hour) {
            out.battery_kw = -deficit.min(stored_kwh(input) * Self::DISCHARGE_FRACTION);
            out.efficiency_pct = 88.0;

            if input.solar_kw + out.battery_kw.abs() < input.demand_kw && input.grid_connected {
                out.grid_import_kw = input.demand_kw - input.solar_kw - out.battery_kw.abs();
                out.efficiency_pct = 82.0;
            }
        } else if input.grid_connected {
            out.grid_import_kw = deficit;
            out.efficiency_pct = 75.0;
        } else {
            out.battery_kw = -deficit.min(stored_kwh(input) * Self::BACKUP_FRACTION);
            out.efficiency_pct = 70.0;
        }
        out
    }
}

/// Dispatch variant selected once per run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStrategy {
    #[default]
    Basic,
    Optimized,
}

impl DispatchStrategy {
    /// Maps the "ML optimization" switch to a strategy.
    pub fn from_ml_flag(ml_optimization: bool) -> Self {
        if ml_optimization {
            Self::Optimized
        } else {
            Self::Basic
        }
    }

    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Optimized => "optimized",
        }
    }
}

impl Controller for DispatchStrategy {
    fn dispatch(&self, input: &StepInput) -> StepDispatch {
        match self {
            Self::Basic => BasicController.dispatch(input),
            Self::Optimized => OptimizedController.dispatch(input),
        }
    }
}

/// Stored energy in kWh at the input's SoC.
fn stored_kwh(input: &StepInput) -> f64 {
    input.battery_capacity_kwh * (input.battery_soc_pct / 100.0)
}
