//! CSV export for normalized tables
//!
//! # CSV Format
//!
//! - **Delimiter:** Comma (`,`)
//! - **Header Row:** Column names in table order
//! - **Timestamps:** `YYYY-MM-DDTHH:MM:SSZ`
//! - **No value:** Empty field (never `0`)
//!
//! # Example
//!
//! ```rust
//! use energy_charts::{csv_export, normalize_value, NormalizeConfig};
//! use serde_json::json;
//!
//! let table = normalize_value(
//!     json!({"unix_seconds": [0, 3600], "price": [10.5, null], "unit": "EUR/MWh"}),
//!     &NormalizeConfig::verbatim(),
//! )
//! .unwrap();
//!
//! let csv = csv_export::to_csv_string(&table).unwrap();
//! assert_eq!(
//!     csv,
//!     "timestamp,price,unit\n\
//!      1970-01-01T00:00:00Z,10.5,EUR/MWh\n\
//!      1970-01-01T01:00:00Z,,EUR/MWh\n"
//! );
//! ```

use std::io;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExportError;
use crate::types::Table;

/// Write `table` as CSV to any writer
pub fn write_csv<W: io::Write>(table: &Table, writer: W) -> Result<(), ExportError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.cells().iter().map(|cell| cell.to_string()))?;
    }

    writer.flush().map_err(csv::Error::from)?;
    log::debug!(
        "wrote {} rows x {} columns as CSV",
        table.len(),
        table.columns().len()
    );
    Ok(())
}

/// Render `table` as a CSV string
pub fn to_csv_string(table: &Table) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExportError::Utf8(e.to_string()))
}

impl Table {
    /// Render the table as CSV; see [`to_csv_string`]
    pub fn to_csv_string(&self) -> Result<String, ExportError> {
        to_csv_string(self)
    }
}

/// Write `table` to a CSV file, replacing any existing file
pub fn write_csv_file(table: &Table, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let file = std::fs::File::create(path.as_ref()).map_err(csv::Error::from)?;
    write_csv(table, io::BufWriter::new(file))
}
