//! Advisory strings derived from end-of-run KPIs.

use super::kpi::KpiReport;

/// Solar-to-consumption ratio below which more panel capacity is advised.
pub const MIN_SOLAR_FRACTION: f64 = 0.50;
/// Grid-to-consumption ratio above which more storage is advised.
pub const MAX_GRID_DEPENDENCY: f64 = 0.40;
/// Average dispatch efficiency (%) below which maintenance is advised.
pub const MIN_AVERAGE_EFFICIENCY_PCT: f64 = 80.0;
/// Recommended battery kWh per kW of panel capacity.
pub const BATTERY_TO_PANEL_RATIO: f64 = 2.0;

pub const SCHEDULING_ADVICE: &str =
    "ML model suggests implementing time-based charging schedules during peak solar hours.";
pub const MAINTENANCE_ADVICE: &str =
    "Deep learning analysis recommends predictive maintenance for optimal performance.";

/// Evaluates every rule independently and returns the advisories that apply,
/// followed by the two standing advisories.
///
/// # Arguments
///
/// * `kpi` - Unrounded run KPIs
/// * `battery_capacity_kwh` - Installed battery capacity
/// * `panel_capacity_kw` - Installed PV capacity
pub fn recommendations(
    kpi: &KpiReport,
    battery_capacity_kwh: f64,
    panel_capacity_kw: f64,
) -> Vec<String> {
    let mut out = Vec::new();

    if kpi.solar_fraction().is_some_and(|f| f < MIN_SOLAR_FRACTION) {
        out.push(
            "Consider increasing solar panel capacity by 30-50% to improve renewable energy \
             utilization."
                .to_string(),
        );
    }

    if kpi.grid_dependency().is_some_and(|g| g > MAX_GRID_DEPENDENCY) {
        out.push(
            "High grid dependency detected. Increase battery capacity to store excess solar \
             energy."
                .to_string(),
        );
    }

    if kpi.average_efficiency_pct < MIN_AVERAGE_EFFICIENCY_PCT {
        out.push(
            "System efficiency is below optimal. Review component specifications and \
             maintenance schedules."
                .to_string(),
        );
    }

    let target_kwh = panel_capacity_kw * BATTERY_TO_PANEL_RATIO;
    if battery_capacity_kwh < target_kwh {
        out.push(format!(
            "Battery capacity is low relative to solar capacity. Consider upgrading to \
             {target_kwh:.0} kWh for better energy storage."
        ));
    }

    out.push(SCHEDULING_ADVICE.to_string());
    out.push(MAINTENANCE_ADVICE.to_string());
    out
}
