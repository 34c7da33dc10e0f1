//! CSV and JSON export for simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::SimError;
use crate::sim::types::{HourlyRecord, SimulationResult};

/// Column header for the hourly trace CSV.
const HEADER: &str = "hour,solar_kw,battery_kw,grid_kw,ev_kw,soc_pct,efficiency_pct";

/// Exports the hourly trace to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `records` - Hourly records of a complete run
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_hourly_csv(records: &[HourlyRecord], path: &Path) -> Result<(), SimError> {
    let file = File::create(path)?;
    write_hourly_csv(records, io::BufWriter::new(file))
}

/// Writes the hourly trace as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_hourly_csv(records: &[HourlyRecord], writer: impl Write) -> Result<(), SimError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in records {
        wtr.write_record(&[
            r.hour.to_string(),
            format!("{:.2}", r.solar_kw),
            format!("{:.2}", r.battery_kw),
            format!("{:.2}", r.grid_import_kw),
            format!("{:.2}", r.ev_demand_kw),
            format!("{:.1}", r.soc_pct),
            format!("{:.2}", r.efficiency_pct),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the full result as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if file creation or serialization fails.
pub fn export_report_json(result: &SimulationResult, path: &Path) -> Result<(), SimError> {
    let file = File::create(path)?;
    write_report_json(result, io::BufWriter::new(file))
}

/// Writes the full result as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_report_json(result: &SimulationResult, mut writer: impl Write) -> Result<(), SimError> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
