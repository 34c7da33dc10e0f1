//! Typed per-hour override records and their column precedence rules.

use serde::{Deserialize, Serialize};

/// Externally supplied values that replace parts of the modeled inputs for one hour.
///
/// Every field is optional; a missing field falls back to the modeled value for
/// that quantity only. Field names match the recognized import columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideRow {
    pub irradiance: Option<f64>,
    pub solar_irradiance: Option<f64>,
    #[serde(rename = "GHI")]
    pub ghi: Option<f64>,
    pub temperature: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub ev_demand: Option<f64>,
    pub demand: Option<f64>,
    pub consumption: Option<f64>,
}

type Field = fn(&OverrideRow) -> Option<f64>;

/// Irradiance columns, applied in order with the last present value winning.
pub const IRRADIANCE_COLUMNS: [(&str, Field); 3] = [
    ("irradiance", |r| r.irradiance),
    ("solar_irradiance", |r| r.solar_irradiance),
    ("GHI", |r| r.ghi),
];

/// Demand columns, checked in order with the first present value winning.
pub const DEMAND_COLUMNS: [(&str, Field); 3] = [
    ("ev_demand", |r| r.ev_demand),
    ("demand", |r| r.demand),
    ("consumption", |r| r.consumption),
];

/// Drops `NaN` and infinite values so the field falls back like a missing one.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl OverrideRow {
    /// All column names the importer recognizes.
    pub const COLUMNS: &[&str] = &[
        "irradiance",
        "solar_irradiance",
        "GHI",
        "temperature",
        "cloud_cover",
        "ev_demand",
        "demand",
        "consumption",
    ];

    /// Overridden irradiance in W/m², if any irradiance column holds a finite value.
    pub fn irradiance_w_m2(&self) -> Option<f64> {
        IRRADIANCE_COLUMNS
            .iter()
            .fold(None, |acc, (_, get)| finite(get(self)).or(acc))
    }

    /// Overridden EV demand in kW, if any demand column holds a finite value.
    pub fn demand_kw(&self) -> Option<f64> {
        DEMAND_COLUMNS.iter().find_map(|(_, get)| finite(get(self)))
    }

    /// Overridden ambient temperature in °C.
    pub fn temperature_c(&self) -> Option<f64> {
        finite(self.temperature)
    }

    /// Overridden cloud cover in %.
    pub fn cloud_cover_pct(&self) -> Option<f64> {
        finite(self.cloud_cover)
    }

    /// Assigns `value` to the field named by the import column `column`.
    ///
    /// Returns `false` for unrecognized column names.
    pub fn set(&mut self, column: &str, value: f64) -> bool {
        let slot = match column {
            "irradiance" => &mut self.irradiance,
            "solar_irradiance" => &mut self.solar_irradiance,
            "GHI" => &mut self.ghi,
            "temperature" => &mut self.temperature,
            "cloud_cover" => &mut self.cloud_cover,
            "ev_demand" => &mut self.ev_demand,
            "demand" => &mut self.demand,
            "consumption" => &mut self.consumption,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
