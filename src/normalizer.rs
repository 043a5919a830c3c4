//! Response → table normalization
//!
//! Turns one validated [`Response`] into one [`Table`]:
//!
//! 1. The time index (if any) becomes the leading `timestamp` column.
//! 2. Every named series of every group becomes a column, named through the
//!    configured [`NamingPolicy`](crate::naming::NamingPolicy).
//! 3. Remaining sequences become positional columns; scalars are broadcast
//!    to every row.
//! 4. Rows are stable-sorted by timestamp when a time index exists.
//!
//! All columns align by position. With a time index the row count is the
//! index length; without one it is the longest series (an outer join on
//! position). Missing positions hold [`Cell::NoValue`].
//!
//! When two series resolve to the same column name they are merged: cells of
//! the later series replace earlier ones, except where the later cell is
//! `NoValue`. A scalar whose name is already taken by a series column is an
//! error.
//!
//! # Example
//!
//! ```rust
//! use energy_charts::{normalize_value, Cell, ColumnNameMap, NormalizeConfig};
//! use serde_json::json;
//!
//! let names = ColumnNameMap::new()
//!     .with("Solar", "solar")
//!     .with("Wind onshore", "wind_onshore");
//!
//! let table = normalize_value(
//!     json!({
//!         "unix_seconds": [0, 1],
//!         "production_types": [
//!             {"name": "Solar", "data": [1.0, 2.0]},
//!             {"name": "Wind onshore", "data": [3.0, 4.0]}
//!         ]
//!     }),
//!     &NormalizeConfig::strict(names),
//! )
//! .unwrap();
//!
//! assert_eq!(table.columns(), ["timestamp", "solar", "wind_onshore"]);
//! assert_eq!(table.row(1).unwrap().get("wind_onshore"), Some(&Cell::Number(4.0)));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::NormalizeConfig;
use crate::error::NormalizeError;
use crate::response::{Field, Response};
use crate::transformations::align_to_length;
use crate::types::{Cell, Table, TIMESTAMP_COLUMN};

/// Normalize a validated response into a table
///
/// Pure function of its inputs: calling it twice on the same response yields
/// identical tables.
///
/// # Returns
///
/// * `Ok(Table)` - Time-indexed when the response had a time index
/// * `Err(NormalizeError::UnmappedColumnName)` - Strict naming and a label
///   is missing from the map
/// * `Err(NormalizeError::InvalidResponse)` - Timestamp out of range, a
///   data column named `timestamp` next to a time index, or a scalar named
///   like an existing series column
pub fn normalize(response: &Response, config: &NormalizeConfig) -> Result<Table, NormalizeError> {
    let timestamps = response.time_index().map(|t| t.to_utc()).transpose()?;
    let row_count = match &timestamps {
        Some(ts) => ts.len(),
        None => longest_series(response),
    };

    log::debug!(
        "normalizing response: {} fields, {} rows, time index: {}",
        response.fields().len(),
        row_count,
        response.time_index().map_or("none", |t| t.key())
    );

    let mut columns = ColumnSet::new(row_count, timestamps.is_some());

    // Named series first, in group order
    for (key, field) in response.fields() {
        if let Field::Group(series) = field {
            for entry in series {
                let name = config.policy.column_name(&entry.name, &config.names)?;
                let cells = entry.data.iter().map(|v| Cell::from(*v)).collect();
                columns.merge(key, name, cells)?;
            }
        }
    }

    // Then everything else, in response order
    for (key, field) in response.fields() {
        match field {
            Field::Group(_) => {}
            Field::Sequence(values) => {
                let cells = values.iter().map(|v| v.to_cell()).collect();
                columns.merge(key, key.clone(), cells)?;
            }
            Field::Scalar(value) => columns.broadcast(key, value.to_cell())?,
        }
    }

    Ok(columns.into_table(timestamps))
}

/// Validate and normalize a decoded JSON value
pub fn normalize_value(
    value: serde_json::Value,
    config: &NormalizeConfig,
) -> Result<Table, NormalizeError> {
    let response = Response::from_value(value)?;
    normalize(&response, config)
}

/// Decode, validate and normalize a JSON document
pub fn normalize_json_str(json: &str, config: &NormalizeConfig) -> Result<Table, NormalizeError> {
    let response = Response::from_json_str(json)?;
    normalize(&response, config)
}

/// Row count of a response without a time index
fn longest_series(response: &Response) -> usize {
    response
        .fields()
        .iter()
        .map(|(_, field)| match field {
            Field::Group(series) => series.iter().map(|s| s.data.len()).max().unwrap_or(0),
            Field::Sequence(values) => values.len(),
            Field::Scalar(_) => 0,
        })
        .max()
        .unwrap_or(0)
}

// ============================================================================
// Column accumulation
// ============================================================================

/// Column-major buffer, transposed into rows at the end
struct ColumnSet {
    row_count: usize,
    time_indexed: bool,
    names: Vec<String>,
    cells: Vec<Vec<Cell>>,
    positions: HashMap<String, usize>,
}

impl ColumnSet {
    fn new(row_count: usize, time_indexed: bool) -> Self {
        Self {
            row_count,
            time_indexed,
            names: Vec::new(),
            cells: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Add a column, or merge into an existing column of the same name
    fn merge(&mut self, field: &str, name: String, cells: Vec<Cell>) -> Result<(), NormalizeError> {
        if self.time_indexed && name == TIMESTAMP_COLUMN {
            return Err(NormalizeError::invalid(format!(
                "field '{}' produces a '{}' column that collides with the time index",
                field, TIMESTAMP_COLUMN
            )));
        }

        if cells.len() > self.row_count {
            log::warn!(
                "'{}' in '{}' has {} values for {} rows, extra values dropped",
                name,
                field,
                cells.len(),
                self.row_count
            );
        } else if cells.len() < self.row_count {
            log::debug!(
                "'{}' in '{}' has {} values for {} rows, padding with no value",
                name,
                field,
                cells.len(),
                self.row_count
            );
        }
        let cells = align_to_length(cells, self.row_count);

        match self.positions.get(&name) {
            Some(&idx) => {
                log::debug!("merging duplicate column '{}' from '{}'", name, field);
                for (existing, incoming) in self.cells[idx].iter_mut().zip(cells) {
                    if !incoming.is_no_value() {
                        *existing = incoming;
                    }
                }
            }
            None => {
                self.positions.insert(name.clone(), self.names.len());
                self.names.push(name);
                self.cells.push(cells);
            }
        }
        Ok(())
    }

    /// Add a column holding `cell` in every row
    ///
    /// Unlike series, a broadcast value cannot merge into an existing column:
    /// it has no `NoValue` cells, so it would replace every value.
    fn broadcast(&mut self, field: &str, cell: Cell) -> Result<(), NormalizeError> {
        if self.positions.contains_key(field) {
            return Err(NormalizeError::invalid(format!(
                "scalar field '{}' collides with a series column of the same name",
                field
            )));
        }
        self.merge(field, field.to_string(), vec![cell; self.row_count])
    }

    /// Transpose into rows, prefixing and sorting by `timestamps` when present
    fn into_table(self, timestamps: Option<Vec<DateTime<Utc>>>) -> Table {
        let mut order: Vec<usize> = (0..self.row_count).collect();
        if let Some(ts) = &timestamps {
            // sort_by_key is stable: equal timestamps keep input order
            order.sort_by_key(|&i| ts[i]);
        }

        let mut columns = Vec::with_capacity(self.names.len() + 1);
        if timestamps.is_some() {
            columns.push(TIMESTAMP_COLUMN.to_string());
        }
        columns.extend(self.names);

        let rows = order
            .into_iter()
            .map(|i| {
                let mut row = Vec::with_capacity(columns.len());
                if let Some(ts) = &timestamps {
                    row.push(Cell::Timestamp(ts[i]));
                }
                row.extend(self.cells.iter().map(|column| column[i].clone()));
                row
            })
            .collect();

        Table::new(columns, rows, timestamps.is_some())
    }
}
