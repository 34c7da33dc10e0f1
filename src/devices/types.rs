//! Common types and traits for station components.

use crate::sim::overrides::OverrideRow;

/// Contextual information passed to devices during power calculations.
/// Includes the current hour, the optional imported override row for that hour,
/// and an optional setpoint for controllable devices.
/// # Fields
/// * `hour` - Current simulation hour
/// * `overrides` - Imported override row for this hour, if any
/// * `setpoint_kw` - Optional power setpoint for controllable devices (kW)
pub struct DeviceContext<'a> {
    pub hour: usize,
    pub overrides: Option<&'a OverrideRow>,
    pub setpoint_kw: Option<f64>,
}

impl<'a> DeviceContext<'a> {
    /// Creates a new DeviceContext with the given hour, no overrides and no setpoint.
    pub fn new(hour: usize) -> Self {
        Self {
            hour,
            overrides: None,
            setpoint_kw: None,
        }
    }

    /// Creates a new DeviceContext carrying the override row for this hour.
    pub fn with_overrides(hour: usize, overrides: Option<&'a OverrideRow>) -> Self {
        Self {
            hour,
            overrides,
            setpoint_kw: None,
        }
    }

    /// Creates a new DeviceContext with the given hour and setpoint.
    pub fn with_setpoint(hour: usize, setpoint_kw: f64) -> Self {
        Self {
            hour,
            overrides: None,
            setpoint_kw: Some(setpoint_kw),
        }
    }
}

/// Trait defining a station component that produces, consumes, or stores electricity.
///
/// Solar generation and EV demand are reported as positive magnitudes; the
/// battery reports its flow with positive=charge, negative=discharge.
pub trait Device {
    /// Returns the power value for the hour described by `context`.
    ///
    /// # Arguments
    ///
    /// * `context` - Contextual information about the current hour, like:
    ///  - `hour`: Current simulation hour
    ///  - `overrides`: Imported per-hour values replacing modeled inputs
    ///  - `setpoint_kw`: Optional power setpoint for controllable devices
    ///
    /// # Returns
    ///
    /// Power in kilowatts (kW) for the hour
    fn power_kw(&mut self, context: &DeviceContext<'_>) -> f64;
}
