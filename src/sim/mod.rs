/// Dispatch controllers and strategy selection.
pub mod controller;
pub mod engine;
pub mod kpi;
/// Per-hour input overrides and column precedence.
pub mod overrides;
pub mod recommend;
/// Instantaneous operating estimate with converter efficiencies.
pub mod snapshot;
pub mod types;
