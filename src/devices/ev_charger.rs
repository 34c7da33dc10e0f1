use crate::devices::types::{Device, DeviceContext};
use crate::sim::overrides::OverrideRow;

/// First hour of the daytime demand window (inclusive).
pub const DAYTIME_START_HOUR: usize = 8;
/// Last hour of the daytime demand window (inclusive).
pub const DAYTIME_END_HOUR: usize = 18;
/// Demand multiplier inside the daytime window.
pub const DAYTIME_MULTIPLIER: f64 = 1.2;
/// Demand multiplier outside the daytime window.
pub const NIGHTTIME_MULTIPLIER: f64 = 0.8;

/// Aggregate EV charging load of the station.
///
/// Demand is the base value scaled by a two-level time-of-day multiplier,
/// unless the hour's imported [`OverrideRow`] carries a demand column.
/// Hours are taken as-is (no wrap), so in runs longer than 24 hours only the
/// first day sees the daytime window.
#[derive(Debug, Clone)]
pub struct EvChargingLoad {
    /// Base charging demand in kilowatts.
    pub base_demand_kw: f64,

    /// Number of installed chargers. Does not affect demand.
    pub chargers: u32,
}

impl EvChargingLoad {
    /// Creates a new charging load.
    ///
    /// # Arguments
    ///
    /// * `base_demand_kw` - Base demand in kW
    /// * `chargers` - Number of installed chargers
    pub fn new(base_demand_kw: f64, chargers: u32) -> Self {
        Self {
            base_demand_kw,
            chargers,
        }
    }

    /// Time-of-day multiplier for `hour`.
    pub fn multiplier(hour: usize) -> f64 {
        if (DAYTIME_START_HOUR..=DAYTIME_END_HOUR).contains(&hour) {
            DAYTIME_MULTIPLIER
        } else {
            NIGHTTIME_MULTIPLIER
        }
    }

    /// Requested demand for `hour` in kW.
    pub fn demand_at(&self, hour: usize, row: Option<&OverrideRow>) -> f64 {
        row.and_then(OverrideRow::demand_kw)
            .unwrap_or_else(|| self.base_demand_kw * Self::multiplier(hour))
    }
}

impl Device for EvChargingLoad {
    fn power_kw(&mut self, context: &DeviceContext<'_>) -> f64 {
        self.demand_at(context.hour, context.overrides)
    }
}
