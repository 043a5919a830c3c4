//! Table data structures produced by the normalizer
//!
//! A [`Table`] is an ordered sequence of rows. Every row has one [`Cell`] per
//! column, so a row can be read positionally or by column name through [`Row`].

use chrono::{DateTime, Utc};
use std::fmt;

use crate::transformations::format_timestamp;

/// Name of the time index column
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// One value in a table
///
/// `NoValue` marks a position with no data. It is distinct from
/// `Number(0.0)` and must not be coerced to zero by callers.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// UTC instant from the time index
    Timestamp(DateTime<Utc>),
    /// Data value (all numeric data is floating point)
    Number(f64),
    /// Text value (labels, units, license strings)
    Text(String),
    /// Flag value (deprecated, substitute)
    Bool(bool),
    /// Explicit "no value" marker
    NoValue,
}

impl Cell {
    pub fn is_no_value(&self) -> bool {
        matches!(self, Cell::NoValue)
    }

    /// Numeric value, `None` for `NoValue` and non-numeric cells
    ///
    /// ```
    /// # use energy_charts::Cell;
    /// assert_eq!(Cell::Number(0.0).as_f64(), Some(0.0));
    /// assert_eq!(Cell::NoValue.as_f64(), None);
    /// ```
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    /// Renders `NoValue` as an empty string (CSV convention)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Timestamp(ts) => write!(f, "{}", format_timestamp(ts)),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::NoValue => Ok(()),
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::NoValue, Cell::Number)
    }
}

/// Row-oriented, optionally time-indexed table
///
/// Built once by [`crate::normalizer::normalize`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    time_indexed: bool,
}

impl Table {
    /// Assemble a table from column names and rows
    ///
    /// Every row must have exactly `columns.len()` cells; when `time_indexed`
    /// is set the first column is [`TIMESTAMP_COLUMN`].
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>, time_indexed: bool) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        debug_assert!(!time_indexed || columns.first().map(String::as_str) == Some(TIMESTAMP_COLUMN));
        Self {
            columns,
            rows,
            time_indexed,
        }
    }

    /// Column names in table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when the table carries a `timestamp` column
    pub fn is_time_indexed(&self) -> bool {
        self.time_indexed
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Numeric view of a column (`None` per `NoValue` or non-numeric cell)
    pub fn column_f64(&self, name: &str) -> Option<Vec<Option<f64>>> {
        self.column(name)
            .map(|cells| cells.into_iter().map(Cell::as_f64).collect())
    }

    /// The time index, if present
    pub fn timestamps(&self) -> Option<Vec<DateTime<Utc>>> {
        if !self.time_indexed {
            return None;
        }
        self.rows.iter().map(|row| row[0].as_timestamp()).collect()
    }

    pub fn row(&self, idx: usize) -> Option<Row<'_>> {
        self.rows.get(idx).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }
}

/// Borrowed view of one table row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Cell for a column name
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.cells[idx])
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    /// `(column, cell)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Cell)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_table() -> Table {
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let t1 = Utc.timestamp_opt(3600, 0).unwrap();
        Table::new(
            vec![
                "timestamp".to_string(),
                "price".to_string(),
                "unit".to_string(),
            ],
            vec![
                vec![
                    Cell::Timestamp(t0),
                    Cell::Number(10.5),
                    Cell::Text("EUR/MWh".to_string()),
                ],
                vec![
                    Cell::Timestamp(t1),
                    Cell::NoValue,
                    Cell::Text("EUR/MWh".to_string()),
                ],
            ],
            true,
        )
    }

    #[test]
    fn test_no_value_is_not_zero() {
        assert_ne!(Cell::NoValue, Cell::Number(0.0));
        assert!(Cell::NoValue.is_no_value());
        assert!(!Cell::Number(0.0).is_no_value());
    }

    #[test]
    fn test_cell_from_option() {
        assert_eq!(Cell::from(Some(1.5)), Cell::Number(1.5));
        assert_eq!(Cell::from(None), Cell::NoValue);
    }

    #[test]
    fn test_cell_display() {
        let ts = Utc.timestamp_opt(3600, 0).unwrap();
        assert_eq!(Cell::Timestamp(ts).to_string(), "1970-01-01T01:00:00Z");
        assert_eq!(Cell::Number(10.5).to_string(), "10.5");
        assert_eq!(Cell::Bool(false).to_string(), "false");
        assert_eq!(Cell::NoValue.to_string(), "");
    }

    #[test]
    fn test_table_column_access() {
        let table = sample_table();
        assert_eq!(table.len(), 2);
        assert!(table.is_time_indexed());
        assert_eq!(table.column_f64("price").unwrap(), vec![Some(10.5), None]);
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_table_timestamps() {
        let table = sample_table();
        let ts = table.timestamps().unwrap();
        assert_eq!(ts[1].timestamp(), 3600);
    }

    #[test]
    fn test_table_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Table>();
        assert_send_sync::<crate::response::Response>();
        assert_send_sync::<crate::config::NormalizeConfig>();
    }

    #[test]
    fn test_row_lookup_by_name() {
        let table = sample_table();
        let row = table.row(1).unwrap();
        assert_eq!(row.get("price"), Some(&Cell::NoValue));
        assert_eq!(row.get("unit").and_then(Cell::as_str), Some("EUR/MWh"));
        assert_eq!(row.iter().count(), 3);
    }
}
