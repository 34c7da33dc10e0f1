//! Simulation engine that orchestrates the station models, controller, and totals.

use tracing::{debug, info};

use crate::devices::{Battery, Device, DeviceContext, EvChargingLoad, SolarArray};
use crate::error::SimError;

use super::controller::{Controller, DispatchStrategy};
use super::kpi::EnergyTotals;
use super::overrides::OverrideRow;
use super::recommend::recommendations;
use super::types::{
    HourlyRecord, SimulationParameters, SimulationResult, StepInput, round1, round2,
};

/// Simulation engine owning the station models, controller, and run state.
///
/// Generic over `C: Controller` for static dispatch. Hours run strictly in
/// order: each hour's dispatch reads the SoC left by the previous one.
pub struct Engine<C: Controller> {
    duration_hours: usize,
    grid_connected: bool,
    solar: SolarArray,
    load: EvChargingLoad,
    battery: Battery,
    controller: C,
    overrides: Vec<OverrideRow>,
    totals: EnergyTotals,
}

impl<C: Controller> Engine<C> {
    /// Creates a new engine for `params`, which must already be valid.
    ///
    /// # Panics
    ///
    /// Panics if `params.battery_capacity_kwh` is not positive.
    pub fn new(params: &SimulationParameters, controller: C) -> Self {
        Self {
            duration_hours: params.duration_hours,
            grid_connected: params.grid_connected,
            solar: SolarArray::from_parameters(params),
            load: EvChargingLoad::new(params.ev_demand_kw, params.ev_chargers),
            battery: Battery::new(params.battery_capacity_kwh, params.initial_soc_pct),
            controller,
            overrides: params.overrides.clone(),
            totals: EnergyTotals::default(),
        }
    }

    /// Executes one hour and returns its rounded record.
    ///
    /// # Arguments
    ///
    /// * `hour` - Hour index; must follow the previous call's index
    pub fn step(&mut self, hour: usize) -> HourlyRecord {
        let context = DeviceContext::with_overrides(hour, self.overrides.get(hour));

        // 1. Read models
        let solar_kw = self.solar.power_kw(&context);
        let demand_kw = self.load.power_kw(&context);

        // 2. Controller dispatch against the SoC carried in from the last hour
        let input = StepInput {
            hour,
            solar_kw,
            demand_kw,
            battery_soc_pct: self.battery.soc_pct,
            battery_capacity_kwh: self.battery.capacity_kwh,
            grid_connected: self.grid_connected,
        };
        let dispatch = self.controller.dispatch(&input);

        // 3. Apply battery flow
        let battery_kw = self
            .battery
            .power_kw(&DeviceContext::with_setpoint(hour, dispatch.battery_kw));

        // 4. Fold into totals
        self.totals.record(&input, &dispatch);

        debug!(
            hour,
            solar_kw,
            demand_kw,
            battery_kw,
            grid_import_kw = dispatch.grid_import_kw,
            soc_pct = self.battery.soc_pct,
            efficiency_pct = dispatch.efficiency_pct,
            "hour dispatched"
        );

        HourlyRecord {
            hour,
            solar_kw: round2(solar_kw),
            battery_kw: round2(battery_kw),
            grid_import_kw: round2(dispatch.grid_import_kw),
            ev_demand_kw: round2(demand_kw),
            soc_pct: round1(self.battery.soc_pct),
            efficiency_pct: round2(dispatch.efficiency_pct),
        }
    }

    /// Executes all hours and returns the complete, rounded result.
    pub fn run(&mut self) -> SimulationResult {
        let mut hourly_data = Vec::with_capacity(self.duration_hours);
        for hour in 0..self.duration_hours {
            hourly_data.push(self.step(hour));
        }

        let kpi = self.totals.finish(self.duration_hours);
        let recommendations =
            recommendations(&kpi, self.battery.capacity_kwh, self.solar.capacity_kw);

        info!(
            hours = self.duration_hours,
            total_solar_kwh = kpi.total_solar_kwh,
            total_grid_import_kwh = kpi.total_grid_import_kwh,
            final_soc_pct = self.battery.soc_pct,
            "simulation finished"
        );

        SimulationResult {
            duration: self.duration_hours,
            hourly_data,
            total_solar_generation: round2(kpi.total_solar_kwh),
            total_battery_discharge: round2(kpi.total_battery_discharge_kwh),
            total_grid_import: round2(kpi.total_grid_import_kwh),
            total_energy_consumed: round2(kpi.total_consumed_kwh),
            average_efficiency: round2(kpi.average_efficiency_pct),
            peak_solar_generation: round2(kpi.peak_solar_kw),
            estimated_cost_savings: round2(kpi.estimated_cost_savings),
            final_battery_soc: round1(self.battery.soc_pct),
            recommendations,
        }
    }

    /// Returns a reference to the battery (current SoC).
    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Returns the running totals accumulated so far.
    pub fn totals(&self) -> &EnergyTotals {
        &self.totals
    }
}

/// Validates `params`, selects the dispatch strategy, and runs every hour.
///
/// # Errors
///
/// Returns `SimError::InvalidParameter` before the first hour if any input is
/// non-finite or out of range.
///
/// # Examples
///
/// ```
/// use ev_solar_sim::sim::engine::run_simulation;
/// use ev_solar_sim::sim::types::SimulationParameters;
///
/// let result = run_simulation(&SimulationParameters::default()).unwrap();
/// assert_eq!(result.hourly_data.len(), 24);
/// ```
pub fn run_simulation(params: &SimulationParameters) -> Result<SimulationResult, SimError> {
    params.validate()?;

    let strategy = DispatchStrategy::from_ml_flag(params.ml_optimization);
    info!(
        strategy = strategy.name(),
        hours = params.duration_hours,
        override_rows = params.overrides.len(),
        grid_connected = params.grid_connected,
        "simulation started"
    );

    let mut engine = Engine::new(params, strategy);
    Ok(engine.run())
}
