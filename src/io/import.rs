use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::{info, warn};

use crate::error::SimError;
use crate::sim::overrides::OverrideRow;

/// A recognized column whose cell could not be read as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedCell {
    /// Zero-based data row (and therefore hour) index.
    pub row: usize,
    /// Column header.
    pub column: String,
    /// Raw cell text.
    pub value: String,
}

/// Override rows read from a CSV, plus the cells that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedOverrides {
    /// One row per data line; row `i` applies to hour `i`.
    pub rows: Vec<OverrideRow>,
    /// Cells in recognized columns that were not finite numbers.
    pub malformed: Vec<MalformedCell>,
}

/// Reads a headed override CSV from any reader.
///
/// Headers are matched exactly after trimming; unrecognized columns are
/// ignored. Empty cells leave the field absent. A cell that does not parse
/// as a finite number is skipped with a warning and listed in
/// [`ImportedOverrides::malformed`]; it never aborts the import.
///
/// # Errors
///
/// Returns `SimError::Csv` if the input is not structurally valid CSV.
pub fn read_overrides(reader: impl Read) -> Result<ImportedOverrides, SimError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<(usize, String)> = rdr
        .headers()?
        .iter()
        .enumerate()
        .filter(|(_, h)| OverrideRow::COLUMNS.contains(h))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut imported = ImportedOverrides::default();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record?;
        let mut row = OverrideRow::default();
        for (col_idx, column) in &columns {
            let cell = record.get(*col_idx).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    row.set(column, value);
                }
                _ => {
                    warn!(row = row_idx, column = %column, value = cell, "skipping non-numeric override cell");
                    imported.malformed.push(MalformedCell {
                        row: row_idx,
                        column: column.clone(),
                        value: cell.to_string(),
                    });
                }
            }
        }
        imported.rows.push(row);
    }

    Ok(imported)
}

/// Loads override rows from a CSV file.
///
/// # Errors
///
/// Returns `SimError::Io` if the file cannot be opened, or `SimError::Csv`
/// if it is not valid CSV.
pub fn load_overrides(path: &Path) -> Result<ImportedOverrides, SimError> {
    let file = File::open(path)?;
    let imported = read_overrides(io::BufReader::new(file))?;
    info!(
        path = %path.display(),
        rows = imported.rows.len(),
        skipped_cells = imported.malformed.len(),
        "override file loaded"
    );
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> ImportedOverrides {
        read_overrides(csv.as_bytes()).unwrap()
    }

    #[test]
    fn rows_map_to_hours_in_order() {
        let imported = read("demand,GHI\n10,500\n20,\n,\n");
        assert_eq!(imported.rows.len(), 3);
        assert_eq!(imported.rows[0].demand_kw(), Some(10.0));
        assert_eq!(imported.rows[0].irradiance_w_m2(), Some(500.0));
        assert_eq!(imported.rows[1].demand_kw(), Some(20.0));
        assert_eq!(imported.rows[1].irradiance_w_m2(), None);
        assert!(imported.rows[2].is_empty());
    }

    #[test]
    fn headers_and_cells_are_trimmed() {
        let imported = read(" temperature , cloud_cover \n 30 , 10 \n");
        assert_eq!(imported.rows[0].temperature, Some(30.0));
        assert_eq!(imported.rows[0].cloud_cover, Some(10.0));
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let imported = read("ghi,Demand,site\n500,10,north\n");
        assert!(imported.rows[0].is_empty());
        assert!(imported.malformed.is_empty());
    }

    #[test]
    fn non_numeric_cells_are_skipped_and_reported() {
        let imported = read("ev_demand,temperature\nabc,30\nNaN,12\n");
        assert_eq!(imported.rows[0].ev_demand, None);
        assert_eq!(imported.rows[0].temperature, Some(30.0));
        assert_eq!(imported.rows[1].ev_demand, None);
        assert_eq!(imported.malformed.len(), 2);
        assert_eq!(
            imported.malformed[0],
            MalformedCell {
                row: 0,
                column: "ev_demand".into(),
                value: "abc".into(),
            }
        );
    }

    #[test]
    fn short_rows_are_tolerated() {
        let imported = read("irradiance,demand\n400\n");
        assert_eq!(imported.rows[0].irradiance, Some(400.0));
        assert_eq!(imported.rows[0].demand, None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_overrides(Path::new("/nonexistent/overrides.csv")).unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
