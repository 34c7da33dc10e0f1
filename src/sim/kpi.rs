//! Running energy totals and end-of-run KPIs.

use std::fmt;

use super::types::{StepDispatch, StepInput, round2};

/// Grid tariff used for savings estimates ($/kWh).
pub const GRID_COST_PER_KWH: f64 = 0.12;
/// Levelized cost of on-site solar ($/kWh).
pub const SOLAR_COST_PER_KWH: f64 = 0.03;

/// Running sums folded in once per hour.
///
/// Hours are one hour long, so kW figures add up directly as kWh.
/// Consumption counts requested demand whether or not it was served.
#[derive(Debug, Clone, Default)]
pub struct EnergyTotals {
    pub solar_kwh: f64,
    pub battery_discharge_kwh: f64,
    pub grid_import_kwh: f64,
    pub consumed_kwh: f64,
    pub efficiency_sum: f64,
    pub peak_solar_kw: f64,
    pub hours: usize,
}

impl EnergyTotals {
    /// Folds one hour's readings and dispatch into the totals.
    pub fn record(&mut self, input: &StepInput, dispatch: &StepDispatch) {
        self.solar_kwh += input.solar_kw;
        if dispatch.battery_kw < 0.0 {
            self.battery_discharge_kwh += dispatch.battery_kw.abs();
        }
        self.grid_import_kwh += dispatch.grid_import_kw;
        self.consumed_kwh += input.demand_kw;
        self.efficiency_sum += dispatch.efficiency_pct;
        self.peak_solar_kw = if self.hours == 0 {
            input.solar_kw
        } else {
            self.peak_solar_kw.max(input.solar_kw)
        };
        self.hours += 1;
    }

    /// Computes the unrounded end-of-run KPIs.
    ///
    /// # Arguments
    ///
    /// * `duration_hours` - Run length used as the efficiency divisor
    pub fn finish(&self, duration_hours: usize) -> KpiReport {
        let average_efficiency_pct = if duration_hours > 0 {
            self.efficiency_sum / duration_hours as f64
        } else {
            0.0
        };
        KpiReport {
            total_solar_kwh: self.solar_kwh,
            total_battery_discharge_kwh: self.battery_discharge_kwh,
            total_grid_import_kwh: self.grid_import_kwh,
            total_consumed_kwh: self.consumed_kwh,
            average_efficiency_pct,
            peak_solar_kw: self.peak_solar_kw,
            estimated_cost_savings: (self.solar_kwh + self.battery_discharge_kwh)
                * (GRID_COST_PER_KWH - SOLAR_COST_PER_KWH),
        }
    }
}

/// Aggregate indicators of a complete run, at full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiReport {
    pub total_solar_kwh: f64,
    pub total_battery_discharge_kwh: f64,
    pub total_grid_import_kwh: f64,
    pub total_consumed_kwh: f64,
    pub average_efficiency_pct: f64,
    pub peak_solar_kw: f64,
    pub estimated_cost_savings: f64,
}

impl KpiReport {
    /// Share of requested energy matched by solar generation, if anything was requested.
    pub fn solar_fraction(&self) -> Option<f64> {
        (self.total_consumed_kwh > 0.0).then(|| self.total_solar_kwh / self.total_consumed_kwh)
    }

    /// Share of requested energy imported from the grid, if anything was requested.
    pub fn grid_dependency(&self) -> Option<f64> {
        (self.total_consumed_kwh > 0.0)
            .then(|| self.total_grid_import_kwh / self.total_consumed_kwh)
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Solar generation:  {:.2} kWh", round2(self.total_solar_kwh))?;
        writeln!(f, "Battery discharge: {:.2} kWh", round2(self.total_battery_discharge_kwh))?;
        writeln!(f, "Grid import:       {:.2} kWh", round2(self.total_grid_import_kwh))?;
        writeln!(f, "Energy consumed:   {:.2} kWh", round2(self.total_consumed_kwh))?;
        writeln!(f, "Avg efficiency:    {:.2}%", round2(self.average_efficiency_pct))?;
        writeln!(f, "Peak solar:        {:.2} kW", round2(self.peak_solar_kw))?;
        write!(f, "Cost savings:      {:.2} $", round2(self.estimated_cost_savings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(solar_kw: f64, demand_kw: f64) -> StepInput {
        StepInput {
            hour: 0,
            solar_kw,
            demand_kw,
            battery_soc_pct: 50.0,
            battery_capacity_kwh: 100.0,
            grid_connected: true,
        }
    }

    fn dispatch(battery_kw: f64, grid_import_kw: f64, efficiency_pct: f64) -> StepDispatch {
        StepDispatch {
            battery_kw,
            grid_import_kw,
            efficiency_pct,
        }
    }

    #[test]
    fn only_discharge_counts_towards_battery_total() {
        let mut totals = EnergyTotals::default();
        totals.record(&step(10.0, 5.0), &dispatch(4.5, 0.0, 90.0));
        totals.record(&step(0.0, 40.0), &dispatch(-30.0, 10.0, 80.0));
        totals.record(&step(0.0, 40.0), &dispatch(-5.0, 35.0, 80.0));
        assert_eq!(totals.battery_discharge_kwh, 35.0);
        assert_eq!(totals.grid_import_kwh, 45.0);
        assert_eq!(totals.consumed_kwh, 85.0);
        assert_eq!(totals.hours, 3);
    }

    #[test]
    fn consumption_counts_requested_not_served() {
        let mut totals = EnergyTotals::default();
        // islanded hour with nothing covering the demand
        totals.record(&step(0.0, 40.0), &dispatch(0.0, 0.0, 0.0));
        assert_eq!(totals.finish(1).total_consumed_kwh, 40.0);
    }

    #[test]
    fn average_peak_and_savings() {
        let mut totals = EnergyTotals::default();
        totals.record(&step(2.0, 40.0), &dispatch(-30.0, 8.0, 80.0));
        totals.record(&step(13.0, 60.0), &dispatch(0.0, 47.0, 75.0));
        let kpi = totals.finish(2);
        assert_eq!(kpi.average_efficiency_pct, 77.5);
        assert_eq!(kpi.peak_solar_kw, 13.0);
        // (15 + 30) * 0.09
        assert!((kpi.estimated_cost_savings - 4.05).abs() < 1e-9);
    }

    #[test]
    fn ratios_undefined_without_consumption() {
        let kpi = EnergyTotals::default().finish(24);
        assert_eq!(kpi.solar_fraction(), None);
        assert_eq!(kpi.grid_dependency(), None);
        assert_eq!(kpi.average_efficiency_pct, 0.0);
    }

    #[test]
    fn display_does_not_panic() {
        let kpi = EnergyTotals::default().finish(1);
        assert!(format!("{kpi}").starts_with("--- KPI Report ---"));
    }
}
