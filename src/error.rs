//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by parameter validation, configuration loading, and I/O.
///
/// The engine itself only ever returns [`SimError::InvalidParameter`]; the
/// remaining variants come from the configuration and import/export layers.
#[derive(Debug, Error)]
pub enum SimError {
    /// A simulation input is non-finite or outside its allowed range.
    #[error("invalid parameter `{field}`: {message}")]
    InvalidParameter {
        /// Parameter name (e.g., `"battery_capacity_kwh"`).
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },

    /// Scenario configuration could not be parsed or failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// A preset name that does not exist.
    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset {
        /// Requested preset name.
        name: String,
        /// Comma-separated list of known presets.
        available: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message_names_field() {
        let e = SimError::InvalidParameter {
            field: "battery_capacity_kwh",
            message: "must be > 0".into(),
        };
        assert_eq!(
            e.to_string(),
            "invalid parameter `battery_capacity_kwh`: must be > 0"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: SimError = io.into();
        assert!(matches!(e, SimError::Io(_)));
    }
}
