//! File import and export.

/// Hourly trace CSV and JSON report export.
pub mod export;
/// Override CSV import.
pub mod import;
