use std::f64::consts::PI;

use crate::devices::types::{Device, DeviceContext};
use crate::sim::overrides::OverrideRow;
use crate::sim::types::{DiurnalPeriod, SimulationParameters};

/// Nameplate panel efficiency at 25 °C and clear sky.
pub const BASE_PANEL_EFFICIENCY: f64 = 0.20;
/// Fractional efficiency loss per °C above 25 °C.
pub const TEMPERATURE_COEFFICIENT_PER_C: f64 = 0.004;
/// Fraction of irradiance blocked at 100 % cloud cover.
pub const CLOUD_ATTENUATION: f64 = 0.7;

/// A PV array whose output follows a half-sine diurnal profile, derated
/// by temperature and cloud cover.
///
/// Any of irradiance, temperature, or cloud cover can be replaced per hour by
/// an imported [`OverrideRow`]. Generation is unclamped: extreme temperatures
/// or cloud values outside 0–100 % pass straight through the formulas.
#[derive(Debug, Clone)]
pub struct SolarArray {
    /// Installed capacity in kilowatts.
    pub capacity_kw: f64,

    /// Base irradiance at the top of the diurnal arc (W/m²).
    pub irradiance_w_m2: f64,

    /// Ambient temperature (°C).
    pub temperature_c: f64,

    /// Cloud cover (%).
    pub cloud_cover_pct: f64,

    /// Length of the diurnal arc in hours.
    period_hours: f64,
}

impl SolarArray {
    /// Creates a new PV array.
    ///
    /// # Arguments
    ///
    /// * `capacity_kw` - Installed capacity in kW
    /// * `irradiance_w_m2` - Base irradiance in W/m²
    /// * `temperature_c` - Ambient temperature in °C
    /// * `cloud_cover_pct` - Cloud cover in %
    /// * `period_hours` - Length of the half-sine daylight arc in hours (must be > 0)
    ///
    /// # Panics
    ///
    /// Panics if `period_hours` is not positive.
    pub fn new(
        capacity_kw: f64,
        irradiance_w_m2: f64,
        temperature_c: f64,
        cloud_cover_pct: f64,
        period_hours: f64,
    ) -> Self {
        assert!(period_hours > 0.0);
        Self {
            capacity_kw,
            irradiance_w_m2,
            temperature_c,
            cloud_cover_pct,
            period_hours,
        }
    }

    /// Builds the array described by the run parameters.
    pub fn from_parameters(params: &SimulationParameters) -> Self {
        let period_hours = match params.diurnal_period {
            DiurnalPeriod::Fixed24 => 24.0,
            DiurnalPeriod::Duration => params.duration_hours.max(1) as f64,
        };
        Self::new(
            params.panel_capacity_kw,
            params.solar_irradiance_w_m2,
            params.temperature_c,
            params.cloud_cover_pct,
            period_hours,
        )
    }

    /// Diurnal shape multiplier, `max(0, sin(π · hour / period))`.
    pub fn diurnal_multiplier(&self, hour: usize) -> f64 {
        (PI * hour as f64 / self.period_hours).sin().max(0.0)
    }

    /// Irradiance reaching the panels this hour (W/m²), before derating.
    pub fn irradiance_at(&self, hour: usize, row: Option<&OverrideRow>) -> f64 {
        row.and_then(OverrideRow::irradiance_w_m2)
            .unwrap_or_else(|| self.irradiance_w_m2 * self.diurnal_multiplier(hour))
    }

    /// Panel efficiency this hour after temperature and cloud derating.
    pub fn efficiency_at(&self, row: Option<&OverrideRow>) -> f64 {
        let temperature_c = row
            .and_then(OverrideRow::temperature_c)
            .unwrap_or(self.temperature_c);
        let cloud_cover_pct = row
            .and_then(OverrideRow::cloud_cover_pct)
            .unwrap_or(self.cloud_cover_pct);

        let temp_coeff = 1.0 - (temperature_c - 25.0) * TEMPERATURE_COEFFICIENT_PER_C;
        let cloud_factor = 1.0 - (cloud_cover_pct / 100.0) * CLOUD_ATTENUATION;
        BASE_PANEL_EFFICIENCY * temp_coeff * cloud_factor
    }

    /// Generation this hour in kW.
    pub fn generation_kw(&self, hour: usize, row: Option<&OverrideRow>) -> f64 {
        (self.irradiance_at(hour, row) / 1000.0) * self.capacity_kw * self.efficiency_at(row)
    }
}

impl Device for SolarArray {
    /// Generation for `context.hour`, honoring `context.overrides`.
    fn power_kw(&mut self, context: &DeviceContext<'_>) -> f64 {
        self.generation_kw(context.hour, context.overrides)
    }
}
