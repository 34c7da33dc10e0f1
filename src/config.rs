//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SimError;
use crate::sim::overrides::OverrideRow;
use crate::sim::types::{DiurnalPeriod, SimulationParameters};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline station. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length and irradiance shaping.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Weather inputs.
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Station hardware and dispatch switches.
    #[serde(default)]
    pub system: SystemConfig,
}

/// Run length and irradiance shaping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of hours to simulate (must be > 0).
    pub duration_hours: usize,
    /// `"fixed24"` or `"duration"`.
    pub diurnal_period: DiurnalPeriod,
    /// Optional override CSV, relative to the working directory.
    pub overrides: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_hours: 24,
            diurnal_period: DiurnalPeriod::Fixed24,
            overrides: None,
        }
    }
}

/// Weather inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Base solar irradiance (W/m²).
    pub solar_irradiance_w_m2: f64,
    /// Ambient temperature (°C).
    pub temperature_c: f64,
    /// Cloud cover (%).
    pub cloud_cover_pct: f64,
    /// Wind speed (m/s).
    pub wind_speed_m_s: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            solar_irradiance_w_m2: 800.0,
            temperature_c: 25.0,
            cloud_cover_pct: 20.0,
            wind_speed_m_s: 5.0,
        }
    }
}

/// Station hardware and dispatch switches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Installed PV capacity (kW).
    pub panel_capacity_kw: f64,
    /// Battery capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// State of charge at hour 0 (%).
    pub initial_soc_pct: f64,
    /// Number of chargers.
    pub ev_chargers: u32,
    /// Base EV demand (kW).
    pub ev_demand_kw: f64,
    /// Whether grid import is available.
    pub grid_connected: bool,
    /// Use the optimized dispatch heuristic.
    pub ml_optimization: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            panel_capacity_kw: 100.0,
            battery_capacity_kwh: 200.0,
            initial_soc_pct: 80.0,
            ev_chargers: 4,
            ev_demand_kw: 50.0,
            grid_connected: true,
            ml_optimization: true,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"system.battery_capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(format!("{}: {}", e.field, e.message))
    }
}

impl ScenarioConfig {
    /// Returns the baseline station.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Islanded station: no grid import, otherwise baseline.
    pub fn off_grid() -> Self {
        Self {
            system: SystemConfig {
                grid_connected: false,
                ..SystemConfig::default()
            },
            ..Self::default()
        }
    }

    /// Dim, cold, overcast day dispatched with the basic strategy.
    pub fn cloudy_winter() -> Self {
        Self {
            environment: EnvironmentConfig {
                solar_irradiance_w_m2: 300.0,
                temperature_c: 2.0,
                cloud_cover_pct: 75.0,
                wind_speed_m_s: 9.0,
            },
            system: SystemConfig {
                ml_optimization: false,
                ..SystemConfig::default()
            },
            ..Self::default()
        }
    }

    /// Storage well under twice the PV capacity, starting half full.
    pub fn undersized_battery() -> Self {
        Self {
            system: SystemConfig {
                battery_capacity_kwh: 80.0,
                initial_soc_pct: 50.0,
                ..SystemConfig::default()
            },
            ..Self::default()
        }
    }

    /// Names of all built-in presets.
    pub const PRESETS: &[&str] = &["baseline", "off_grid", "cloudy_winter", "undersized_battery"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownPreset` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, SimError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "off_grid" => Ok(Self::off_grid()),
            "cloudy_winter" => Ok(Self::cloudy_winter()),
            "undersized_battery" => Ok(Self::undersized_battery()),
            _ => Err(SimError::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Applies the same checks the engine runs before the first hour, so a
    /// scenario that passes here never fails parameter validation.
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        self.to_parameters(Vec::new())
            .violations()
            .into_iter()
            .filter_map(|e| match e {
                SimError::InvalidParameter { field, message } => Some(ConfigError {
                    field: format!("{}.{field}", section_of(field)),
                    message,
                }),
                _ => None,
            })
            .collect()
    }

    /// Builds engine parameters, attaching already-loaded override rows.
    ///
    /// # Arguments
    ///
    /// * `overrides` - Per-hour override rows (row `i` applies to hour `i`)
    pub fn to_parameters(&self, overrides: Vec<OverrideRow>) -> SimulationParameters {
        let env = &self.environment;
        let sys = &self.system;
        SimulationParameters {
            solar_irradiance_w_m2: env.solar_irradiance_w_m2,
            temperature_c: env.temperature_c,
            cloud_cover_pct: env.cloud_cover_pct,
            wind_speed_m_s: env.wind_speed_m_s,
            panel_capacity_kw: sys.panel_capacity_kw,
            battery_capacity_kwh: sys.battery_capacity_kwh,
            initial_soc_pct: sys.initial_soc_pct,
            ev_chargers: sys.ev_chargers,
            ev_demand_kw: sys.ev_demand_kw,
            grid_connected: sys.grid_connected,
            ml_optimization: sys.ml_optimization,
            duration_hours: self.simulation.duration_hours,
            diurnal_period: self.simulation.diurnal_period,
            overrides,
        }
    }
}

/// TOML section holding the parameter `field`.
fn section_of(field: &str) -> &'static str {
    match field {
        "duration_hours" => "simulation",
        "solar_irradiance_w_m2" | "temperature_c" | "cloud_cover_pct" | "wind_speed_m_s" => {
            "environment"
        }
        _ => "system",
    }
}
