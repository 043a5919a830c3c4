//! Energy-Charts client - typed access to the Fraunhofer ISE Energy-Charts API
//!
//! Fetches public electricity data (generation, prices, installed capacity,
//! cross-border flows, renewable share forecasts) from
//! `https://api.energy-charts.info` and normalizes every response shape into
//! one time-aligned [`Table`].
//!
//! # Features
//! - Typed request builders for every endpoint (countries, bidding zones, regions)
//! - Response schema validation (time index, named series groups, scalars)
//! - Tabular normalization with configurable column naming policies
//! - CSV export of normalized tables
//!
//! # Example
//!
//! ```rust
//! use energy_charts::{normalize_json_str, ColumnNameMap, NormalizeConfig};
//!
//! let body = r#"{
//!     "unix_seconds": [1704067200, 1704070800],
//!     "production_types": [
//!         {"name": "Solar", "data": [0.0, 1.5]},
//!         {"name": "Wind onshore", "data": [20.1, null]}
//!     ],
//!     "deprecated": false
//! }"#;
//!
//! let table = normalize_json_str(body, &NormalizeConfig::strict(ColumnNameMap::production_types()))?;
//! assert_eq!(table.columns(), ["timestamp", "solar", "wind_onshore", "deprecated"]);
//! assert_eq!(table.column_f64("wind_onshore"), Some(vec![Some(20.1), None]));
//! # Ok::<(), energy_charts::NormalizeError>(())
//! ```

pub mod client;
pub mod config;
pub mod csv_export;
pub mod endpoints;
mod error;
pub mod naming;
pub mod normalizer;
pub mod response;
pub mod transformations;
mod types;

// Re-export public types for easier access
pub use client::{EnergyChartsClient, Fetcher};
pub use config::{ClientConfig, NormalizeConfig};
pub use endpoints::{
    ApiRequest, BiddingZone, Country, Endpoint, ForecastType, ProductionType, Region, SubType,
    TimeStep,
};
pub use error::{ApiError, ConfigError, EnergyChartsError, ExportError, NormalizeError};
pub use naming::{ColumnNameMap, NamingPolicy};
pub use normalizer::{normalize, normalize_json_str, normalize_value};
pub use response::Response;
pub use types::{Cell, Row, Table, TIMESTAMP_COLUMN};
