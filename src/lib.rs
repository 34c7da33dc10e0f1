//! Hourly energy simulator for a solar-powered EV charging station with battery storage.

/// REST API for querying simulation results (requires `api` feature).
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod devices;
pub mod error;
pub mod io;
pub mod logging;
/// Engine, dispatch controllers, KPIs, and recommendations.
pub mod sim;
