use crate::devices::types::{Device, DeviceContext};

/// Lowest SoC the charge-protection clamp allows (%).
pub const MIN_SOC_PCT: f64 = 10.0;
/// Highest SoC the charge-protection clamp allows (%).
pub const MAX_SOC_PCT: f64 = 95.0;

/// A stationary battery tracked as a single state-of-charge percentage.
///
/// `Battery` does not limit the flows it is given; the controller sizes them.
/// After every update the SoC is clamped to [`MIN_SOC_PCT`, `MAX_SOC_PCT`],
/// modeling the charge-protection limits of the pack. The initial SoC is
/// taken as configured and may lie outside that band until the first update.
///
/// # Power Flow Convention
/// - Positive power: Charging (absorbing surplus)
/// - Negative power: Discharging (supplying demand)
#[derive(Debug, Clone)]
pub struct Battery {
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// State of charge in percent.
    pub soc_pct: f64,
}

impl Battery {
    /// Creates a new battery.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (must be > 0)
    /// * `soc_pct` - Initial state of charge in percent
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or negative.
    pub fn new(capacity_kwh: f64, soc_pct: f64) -> Self {
        assert!(capacity_kwh > 0.0);
        Self {
            capacity_kwh,
            soc_pct,
        }
    }

    /// Applies one hour of `flow_kw` and returns the new SoC.
    pub fn advance(&mut self, flow_kw: f64) -> f64 {
        self.soc_pct = next_soc_pct(self.soc_pct, flow_kw, self.capacity_kwh);
        self.soc_pct
    }
}

/// SoC after one hour at `flow_kw`, clamped to the protection band.
pub fn next_soc_pct(soc_pct: f64, flow_kw: f64, capacity_kwh: f64) -> f64 {
    let delta_pct = (flow_kw / capacity_kwh) * 100.0;
    (soc_pct + delta_pct).clamp(MIN_SOC_PCT, MAX_SOC_PCT)
}

impl Device for Battery {
    /// Applies the setpoint as this hour's flow and returns it unchanged.
    fn power_kw(&mut self, context: &DeviceContext<'_>) -> f64 {
        let flow_kw = context.setpoint_kw.unwrap_or(0.0);
        self.advance(flow_kw);
        flow_kw
    }
}
