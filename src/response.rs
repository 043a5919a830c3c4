//! Validated schema for decoded API responses
//!
//! Every endpoint returns a flat JSON object, but the shape of its fields
//! varies. [`Response::from_value`] classifies each field exactly once so the
//! normalizer never has to guess:
//!
//! - **Time index**: `unix_seconds`, or when absent `days` (daily averages)
//!   or `time` (installed power periods)
//! - **Named series groups**: arrays of `{"name": ..., "data": [...]}` records
//!   (`production_types`, `countries`, ...)
//! - **Sequences**: arrays of scalars aligned to the time index by position
//! - **Scalars**: metadata such as `unit`, `license_info`, `deprecated`
//!
//! # Example
//!
//! ```rust
//! use energy_charts::response::{Field, Response};
//!
//! let response = Response::from_json_str(
//!     r#"{"unix_seconds": [0, 3600], "price": [10.5, null], "unit": "EUR/MWh"}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(response.time_index().map(|t| t.len()), Some(2));
//! assert!(matches!(response.field("price"), Some(Field::Sequence(_))));
//! assert!(matches!(response.field("unit"), Some(Field::Scalar(_))));
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::endpoints::TimeStep;
use crate::error::NormalizeError;
use crate::transformations::{date_to_utc, parse_day, parse_period, unix_seconds_to_utc, whole_seconds};
use crate::types::Cell;

/// Key of the unix-seconds time index
pub const UNIX_SECONDS_KEY: &str = "unix_seconds";

/// Key of the day-label time index (daily average endpoints)
pub const DAYS_KEY: &str = "days";

/// Key of the period-label time index (installed power)
pub const TIME_KEY: &str = "time";

/// Fields that hold named series even when the array is empty
pub const GROUP_KEYS: &[&str] = &["production_types", "countries"];

// ============================================================================
// Schema Types
// ============================================================================

/// Scalar JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl Scalar {
    pub fn to_cell(&self) -> Cell {
        match self {
            Scalar::Number(v) => Cell::Number(*v),
            Scalar::Text(s) => Cell::Text(s.clone()),
            Scalar::Bool(b) => Cell::Bool(*b),
            Scalar::Null => Cell::NoValue,
        }
    }
}

/// One `{name, data}` record
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    /// Upstream label, e.g. `"Wind onshore"`
    pub name: String,

    /// Values aligned to the time index; `None` where the API sent `null`
    pub data: Vec<Option<f64>>,
}

/// Time index of a response
#[derive(Debug, Clone, PartialEq)]
pub enum TimeIndex {
    /// Seconds since the epoch (UTC)
    UnixSeconds(Vec<i64>),

    /// Calendar days from `"dd.mm.yyyy"` labels
    Days(Vec<NaiveDate>),

    /// Month or year periods, represented by their first day
    Periods { step: TimeStep, starts: Vec<NaiveDate> },
}

impl TimeIndex {
    pub fn len(&self) -> usize {
        match self {
            TimeIndex::UnixSeconds(v) => v.len(),
            TimeIndex::Days(v) => v.len(),
            TimeIndex::Periods { starts, .. } => starts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Response key this index was read from
    pub fn key(&self) -> &'static str {
        match self {
            TimeIndex::UnixSeconds(_) => UNIX_SECONDS_KEY,
            TimeIndex::Days(_) => DAYS_KEY,
            TimeIndex::Periods { .. } => TIME_KEY,
        }
    }

    /// Absolute UTC instants, one per index entry
    pub fn to_utc(&self) -> Result<Vec<DateTime<Utc>>, NormalizeError> {
        match self {
            TimeIndex::UnixSeconds(secs) => secs.iter().map(|s| unix_seconds_to_utc(*s)).collect(),
            TimeIndex::Days(days) => Ok(days.iter().map(|d| date_to_utc(*d)).collect()),
            TimeIndex::Periods { starts, .. } => {
                Ok(starts.iter().map(|d| date_to_utc(*d)).collect())
            }
        }
    }
}

/// A non-index response field
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Named series records; may be empty
    Group(Vec<NamedSeries>),

    /// Unnamed values aligned by position
    Sequence(Vec<Scalar>),

    /// Metadata broadcast to every row
    Scalar(Scalar),
}

/// Decoded and validated API response
///
/// Immutable once built. Field order is the order of the JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    time_index: Option<TimeIndex>,
    fields: Vec<(String, Field)>,
}

// ============================================================================
// Validation
// ============================================================================

impl Response {
    /// Validate a decoded JSON value
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - Classified fields
    /// * `Err(NormalizeError::InvalidResponse)` - If the value is not an
    ///   object, is empty, has a malformed time index or series record, or
    ///   contains no series at all
    pub fn from_value(value: Value) -> Result<Self, NormalizeError> {
        let object = match value {
            Value::Object(map) => map,
            Value::Null => return Err(NormalizeError::invalid("response is null")),
            other => {
                return Err(NormalizeError::invalid(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        if object.is_empty() {
            return Err(NormalizeError::invalid("response is empty"));
        }

        let time_index = parse_time_index(&object)?;
        let time_key = time_index.as_ref().map(TimeIndex::key);

        let mut fields = Vec::with_capacity(object.len());
        for (key, value) in object {
            if Some(key.as_str()) == time_key {
                continue;
            }
            let field = parse_field(&key, value)?;
            fields.push((key, field));
        }

        let has_series = fields
            .iter()
            .any(|(_, f)| matches!(f, Field::Group(_) | Field::Sequence(_)));
        if time_index.is_none() && !has_series {
            return Err(NormalizeError::invalid(
                "no recognizable series (no time index, no sequences, no named series)",
            ));
        }

        Ok(Self { time_index, fields })
    }

    /// Decode and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, NormalizeError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| NormalizeError::invalid(format!("malformed JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Assert the period granularity the caller requested
    ///
    /// Only period indexes are checked; other responses pass through.
    ///
    /// ```
    /// # use energy_charts::response::Response;
    /// # use energy_charts::TimeStep;
    /// let response = Response::from_json_str(
    ///     r#"{"time": ["2023", "2024"], "production_types": []}"#,
    /// ).unwrap();
    /// assert!(response.clone().with_time_step(TimeStep::Yearly).is_ok());
    /// assert!(response.with_time_step(TimeStep::Monthly).is_err());
    /// ```
    pub fn with_time_step(self, expected: TimeStep) -> Result<Self, NormalizeError> {
        if let Some(TimeIndex::Periods { step, .. }) = &self.time_index {
            if *step != expected {
                return Err(NormalizeError::invalid(format!(
                    "requested {} periods but '{}' holds {} labels",
                    expected, TIME_KEY, step
                )));
            }
        }
        Ok(self)
    }

    pub fn time_index(&self) -> Option<&TimeIndex> {
        self.time_index.as_ref()
    }

    /// Non-index fields in response order
    pub fn fields(&self) -> &[(String, Field)] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }
}

fn parse_time_index(object: &Map<String, Value>) -> Result<Option<TimeIndex>, NormalizeError> {
    if let Some(value) = object.get(UNIX_SECONDS_KEY) {
        let items = expect_array(UNIX_SECONDS_KEY, value)?;
        let seconds = items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                whole_seconds(v).ok_or_else(|| {
                    NormalizeError::invalid(format!(
                        "{}[{}] is not a whole number of seconds: {}",
                        UNIX_SECONDS_KEY, i, v
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(TimeIndex::UnixSeconds(seconds)));
    }

    if let Some(value) = object.get(DAYS_KEY) {
        let labels = expect_labels(DAYS_KEY, value)?;
        let days = labels
            .iter()
            .map(|l| parse_day(l))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(TimeIndex::Days(days)));
    }

    if let Some(value) = object.get(TIME_KEY) {
        let labels = expect_labels(TIME_KEY, value)?;
        let mut step = None;
        let mut starts = Vec::with_capacity(labels.len());
        for label in labels {
            let (label_step, start) = parse_period(label)?;
            match step {
                None => step = Some(label_step),
                Some(s) if s != label_step => {
                    return Err(NormalizeError::invalid(format!(
                        "'{}' mixes {} and {} labels",
                        TIME_KEY, s, label_step
                    )))
                }
                Some(_) => {}
            }
            starts.push(start);
        }
        // An empty period list carries no granularity; yearly is the API default
        let step = step.unwrap_or(TimeStep::Yearly);
        return Ok(Some(TimeIndex::Periods { step, starts }));
    }

    Ok(None)
}

fn parse_field(key: &str, value: Value) -> Result<Field, NormalizeError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => {
            return Err(NormalizeError::invalid(format!(
                "field '{}' is a nested object",
                key
            )))
        }
        scalar => return Ok(Field::Scalar(to_scalar(key, None, scalar)?)),
    };

    let records = items.iter().filter(|v| v.is_object()).count();
    if items.is_empty() && GROUP_KEYS.contains(&key) {
        return Ok(Field::Group(Vec::new()));
    }
    if records == 0 {
        let values = items
            .into_iter()
            .enumerate()
            .map(|(i, v)| to_scalar(key, Some(i), v))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Field::Sequence(values));
    }
    if records != items.len() {
        return Err(NormalizeError::invalid(format!(
            "field '{}' mixes series records with plain values",
            key
        )));
    }

    let series = items
        .into_iter()
        .enumerate()
        .map(|(i, v)| parse_named_series(key, i, v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Field::Group(series))
}

fn parse_named_series(key: &str, idx: usize, value: Value) -> Result<NamedSeries, NormalizeError> {
    let Value::Object(mut record) = value else {
        return Err(NormalizeError::invalid(format!("{}[{}] is not a record", key, idx)));
    };

    let name = match record.remove("name") {
        Some(Value::String(name)) => name,
        _ => {
            return Err(NormalizeError::invalid(format!(
                "{}[{}] has no string 'name'",
                key, idx
            )))
        }
    };

    let data = match record.remove("data") {
        Some(Value::Array(data)) => data,
        _ => {
            return Err(NormalizeError::invalid(format!(
                "{}[{}] ('{}') has no 'data' array",
                key, idx, name
            )))
        }
    };

    let data = data
        .iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(n.as_f64()),
            other => Err(NormalizeError::invalid(format!(
                "{}[{}] ('{}') data[{}] is not a number: {}",
                key, idx, name, i, other
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NamedSeries { name, data })
}

fn to_scalar(key: &str, idx: Option<usize>, value: Value) -> Result<Scalar, NormalizeError> {
    match value {
        Value::Null => Ok(Scalar::Null),
        Value::Bool(b) => Ok(Scalar::Bool(b)),
        Value::Number(n) => Ok(n.as_f64().map_or(Scalar::Null, Scalar::Number)),
        Value::String(s) => Ok(Scalar::Text(s)),
        other => {
            let location = match idx {
                Some(i) => format!("{}[{}]", key, i),
                None => key.to_string(),
            };
            Err(NormalizeError::invalid(format!(
                "{} is a nested {}",
                location,
                json_kind(&other)
            )))
        }
    }
}

fn expect_array<'a>(key: &str, value: &'a Value) -> Result<&'a Vec<Value>, NormalizeError> {
    value.as_array().ok_or_else(|| {
        NormalizeError::invalid(format!("'{}' must be an array, got {}", key, json_kind(value)))
    })
}

fn expect_labels<'a>(key: &str, value: &'a Value) -> Result<Vec<&'a str>, NormalizeError> {
    expect_array(key, value)?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str().ok_or_else(|| {
                NormalizeError::invalid(format!("{}[{}] is not a string label: {}", key, i, v))
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
