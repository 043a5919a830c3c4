//! Value transformations used while normalizing Energy-Charts responses
//!
//! # Transformations
//!
//! 1. **Unix seconds → UTC**: `3600` → `1970-01-01T01:00:00Z`
//! 2. **Day labels**: `"24.10.2024"` → `2024-10-24`
//! 3. **Period labels**: `"2024"` → yearly, `"10.2024"` → monthly
//! 4. **Timestamp formatting**: `DateTime<Utc>` → `"2024-10-24T06:00:00Z"`
//! 5. **Positional alignment**: pad with `NoValue` / truncate to the index length
//!
//! # Example
//!
//! ```rust
//! use energy_charts::transformations::*;
//!
//! let ts = unix_seconds_to_utc(3600).unwrap();
//! assert_eq!(format_timestamp(&ts), "1970-01-01T01:00:00Z");
//!
//! let day = parse_day("24.10.2024").unwrap();
//! assert_eq!(day.to_string(), "2024-10-24");
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use crate::endpoints::TimeStep;
use crate::error::NormalizeError;
use crate::types::Cell;

// ============================================================================
// Transformation 1: Unix Seconds → UTC
// ============================================================================

/// Convert seconds since the epoch to a UTC timestamp
///
/// The API reports all instants in UTC, so no offset is applied.
///
/// # Returns
///
/// * `Ok(DateTime<Utc>)` - Calendar timestamp
/// * `Err(NormalizeError::InvalidResponse)` - Value outside chrono's range
///
/// # Examples
///
/// ```
/// # use energy_charts::transformations::unix_seconds_to_utc;
/// let ts = unix_seconds_to_utc(1704067200).unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00");
/// ```
pub fn unix_seconds_to_utc(seconds: i64) -> Result<DateTime<Utc>, NormalizeError> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        NormalizeError::invalid(format!("unix timestamp out of range: {}", seconds))
    })
}

/// Read a JSON number as whole seconds
///
/// Integral floats (`3600.0`) are accepted, fractional ones are not.
///
/// ```
/// # use energy_charts::transformations::whole_seconds;
/// assert_eq!(whole_seconds(&serde_json::json!(3600)), Some(3600));
/// assert_eq!(whole_seconds(&serde_json::json!(3600.0)), Some(3600));
/// assert_eq!(whole_seconds(&serde_json::json!(0.5)), None);
/// assert_eq!(whole_seconds(&serde_json::json!(null)), None);
/// ```
pub fn whole_seconds(value: &serde_json::Value) -> Option<i64> {
    if let Some(secs) = value.as_i64() {
        return Some(secs);
    }
    let float = value.as_f64()?;
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float <= i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

// ============================================================================
// Transformation 2: Day Labels
// ============================================================================

/// Parse a day label from the daily-average endpoints
///
/// Accepts the API's German format (`DD.MM.YYYY`) and ISO (`YYYY-MM-DD`).
///
/// # Examples
///
/// ```
/// # use energy_charts::transformations::parse_day;
/// assert_eq!(parse_day("01.02.2024").unwrap().to_string(), "2024-02-01");
/// assert_eq!(parse_day("2024-02-01").unwrap().to_string(), "2024-02-01");
/// assert!(parse_day("32.01.2024").is_err());
/// ```
pub fn parse_day(label: &str) -> Result<NaiveDate, NormalizeError> {
    let trimmed = label.trim();
    NaiveDate::parse_from_str(trimmed, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| NormalizeError::invalid(format!("invalid day label: '{}'", label)))
}

// ============================================================================
// Transformation 3: Period Labels
// ============================================================================

/// Parse an installed-power period label
///
/// The granularity comes from the label itself, not from what the caller
/// asked for:
///
/// - `"2024"` → (`Yearly`, 2024-01-01)
/// - `"10.2024"` or `"2024-10"` → (`Monthly`, 2024-10-01)
///
/// # Examples
///
/// ```
/// # use energy_charts::transformations::parse_period;
/// # use energy_charts::TimeStep;
/// let (step, start) = parse_period("2019").unwrap();
/// assert_eq!(step, TimeStep::Yearly);
/// assert_eq!(start.to_string(), "2019-01-01");
///
/// let (step, start) = parse_period("03.2019").unwrap();
/// assert_eq!(step, TimeStep::Monthly);
/// assert_eq!(start.to_string(), "2019-03-01");
///
/// assert!(parse_period("Q1 2019").is_err());
/// ```
pub fn parse_period(label: &str) -> Result<(TimeStep, NaiveDate), NormalizeError> {
    let trimmed = label.trim();
    let invalid = || NormalizeError::invalid(format!("invalid period label: '{}'", label));

    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = trimmed.parse().map_err(|_| invalid())?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        return Ok((TimeStep::Yearly, start));
    }

    let (month, year) = if let Some((m, y)) = trimmed.split_once('.') {
        (m, y)
    } else if let Some((y, m)) = trimmed.split_once('-') {
        (m, y)
    } else {
        return Err(invalid());
    };

    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    Ok((TimeStep::Monthly, start))
}

/// Midnight UTC at the start of `date`
pub fn date_to_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

// ============================================================================
// Transformation 4: Timestamp Formatting
// ============================================================================

/// Format a UTC timestamp as ISO 8601 with `Z` suffix
///
/// ```
/// # use energy_charts::transformations::{format_timestamp, unix_seconds_to_utc};
/// let ts = unix_seconds_to_utc(0).unwrap();
/// assert_eq!(format_timestamp(&ts), "1970-01-01T00:00:00Z");
/// ```
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

// ============================================================================
// Transformation 5: Positional Alignment
// ============================================================================

/// Align a positional series to `len` rows
///
/// Alignment is by position only. Short series are padded with
/// `Cell::NoValue`, long series are cut at `len`.
///
/// # Examples
///
/// ```
/// # use energy_charts::transformations::align_to_length;
/// # use energy_charts::Cell;
/// let cells = vec![Cell::Number(1.0)];
/// assert_eq!(
///     align_to_length(cells, 3),
///     vec![Cell::Number(1.0), Cell::NoValue, Cell::NoValue]
/// );
/// ```
pub fn align_to_length(mut cells: Vec<Cell>, len: usize) -> Vec<Cell> {
    cells.resize(len, Cell::NoValue);
    cells
}
