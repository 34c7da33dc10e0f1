//! Station components: PV array, EV charging load, and battery.

/// Stationary battery state-of-charge tracker.
pub mod battery;
/// Aggregate EV charging demand model.
pub mod ev_charger;
/// Solar photovoltaic generation model.
pub mod solar;
pub mod types;

// Re-export the main types for convenience
pub use battery::Battery;
pub use ev_charger::EvChargingLoad;
pub use solar::SolarArray;
pub use types::Device;
pub use types::DeviceContext;
