//! Canonical column naming for named series
//!
//! Upstream labels such as `"Fossil hard coal"` drift over time. A
//! [`ColumnNameMap`] maps them to stable snake_case identifiers and a
//! [`NamingPolicy`] decides what happens to labels the map does not know.
//!
//! # Example
//!
//! ```rust
//! use energy_charts::naming::{ColumnNameMap, NamingPolicy};
//!
//! let map = ColumnNameMap::production_types();
//! assert_eq!(
//!     NamingPolicy::Strict.column_name("Fossil hard coal", &map).unwrap(),
//!     "fossil_hard_coal"
//! );
//! assert!(NamingPolicy::Strict.column_name("Unknown Type", &map).is_err());
//! assert_eq!(
//!     NamingPolicy::Lenient.column_name("Unknown Type", &map).unwrap(),
//!     "Unknown Type"
//! );
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, NormalizeError};

/// Production type labels reported by the public/total/installed power endpoints
const PRODUCTION_TYPE_NAMES: &[(&str, &str)] = &[
    ("Hydro pumped storage consumption", "hydro_pumped_storage_consumption"),
    ("Cross border electricity trading", "cross_border_electricity_trading"),
    ("Nuclear", "nuclear"),
    ("Hydro Run-of-River", "hydro_run_of_river"),
    ("Biomass", "biomass"),
    ("Fossil brown coal / lignite", "fossil_brown_coal"),
    ("Fossil hard coal", "fossil_hard_coal"),
    ("Fossil oil", "fossil_oil"),
    ("Fossil coal-derived gas", "fossil_coal_gas"),
    ("Fossil gas", "fossil_gas"),
    ("Geothermal", "geothermal"),
    ("Hydro water reservoir", "hydro_water_reservoir"),
    ("Hydro pumped storage", "hydro_pumped_storage"),
    ("Others", "others"),
    ("Waste", "waste"),
    ("Wind offshore", "wind_offshore"),
    ("Wind onshore", "wind_onshore"),
    ("Solar", "solar"),
    ("Load (incl. self-consumption)", "load"),
    ("Load", "load"),
    ("Residual load", "residual_load"),
    ("Renewable share of generation", "renewable_share_of_generation"),
    ("Renewable share of load", "renewable_share_of_load"),
    ("Battery Storage (Capacity)", "battery_storage_capacity"),
    ("Battery Storage (Power)", "battery_storage_power"),
];

/// Lookup from upstream label to canonical column identifier
///
/// Serializes as a flat JSON object: `{"Fossil hard coal": "fossil_hard_coal"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnNameMap {
    names: HashMap<String, String>,
}

impl ColumnNameMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundled map of Energy-Charts production type labels
    pub fn production_types() -> Self {
        PRODUCTION_TYPE_NAMES
            .iter()
            .map(|(label, canonical)| (label.to_string(), canonical.to_string()))
            .collect()
    }

    /// Parse a map from a JSON object of label → identifier
    ///
    /// ```
    /// # use energy_charts::naming::ColumnNameMap;
    /// let map = ColumnNameMap::from_json_str(r#"{"Solar": "solar"}"#).unwrap();
    /// assert_eq!(map.get("Solar"), Some("solar"));
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidNameMap(e.to_string()))
    }

    /// Read a JSON map from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidNameMap(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Add or replace a mapping, returning the map for chaining
    pub fn with(mut self, label: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.insert(label, canonical);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, canonical: impl Into<String>) {
        self.names.insert(label.into(), canonical.into());
    }

    /// Canonical identifier for `label`, if mapped
    pub fn get(&self, label: &str) -> Option<&str> {
        self.names.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(label, canonical)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnNameMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// What to do with a named series label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// Use the label as-is, ignore the map
    #[default]
    Verbatim,

    /// Every label must be in the map
    Strict,

    /// Use the map where possible, otherwise the label as-is
    Lenient,
}

impl NamingPolicy {
    /// Resolve the column name for a named series label
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Column name
    /// * `Err(NormalizeError::UnmappedColumnName)` - Strict mode and `label`
    ///   is not in `names`
    pub fn column_name(&self, label: &str, names: &ColumnNameMap) -> Result<String, NormalizeError> {
        match self {
            NamingPolicy::Verbatim => Ok(label.to_string()),
            NamingPolicy::Strict => names
                .get(label)
                .map(str::to_string)
                .ok_or_else(|| NormalizeError::UnmappedColumnName(label.to_string())),
            NamingPolicy::Lenient => match names.get(label) {
                Some(canonical) => Ok(canonical.to_string()),
                None => {
                    log::debug!("no canonical name for '{}', keeping label", label);
                    Ok(label.to_string())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_map_identifiers_are_snake_case() {
        let map = ColumnNameMap::production_types();
        assert!(!map.is_empty());
        for (label, canonical) in map.iter() {
            assert!(
                canonical
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "{} -> {}",
                label,
                canonical
            );
        }
    }

    #[test]
    fn test_strict_names_unmapped_label() {
        let map = ColumnNameMap::new().with("Solar", "solar");
        let err = NamingPolicy::Strict.column_name("Unknown Type", &map).unwrap_err();
        assert_eq!(err, NormalizeError::UnmappedColumnName("Unknown Type".to_string()));
    }

    #[test]
    fn test_verbatim_ignores_map() {
        let map = ColumnNameMap::new().with("Solar", "solar");
        assert_eq!(NamingPolicy::Verbatim.column_name("Solar", &map).unwrap(), "Solar");
    }

    #[test]
    fn test_lenient_prefers_map() {
        let map = ColumnNameMap::new().with("Wind onshore", "wind_onshore");
        assert_eq!(
            NamingPolicy::Lenient.column_name("Wind onshore", &map).unwrap(),
            "wind_onshore"
        );
    }

    #[test]
    fn test_invalid_json_map() {
        assert!(matches!(
            ColumnNameMap::from_json_str("[1, 2]"),
            Err(ConfigError::InvalidNameMap(_))
        ));
    }

    #[test]
    fn test_missing_map_file() {
        let err = ColumnNameMap::from_path("/nonexistent/names.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/names.json"));
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: NamingPolicy = serde_json::from_str("\"lenient\"").unwrap();
        assert_eq!(policy, NamingPolicy::Lenient);
    }
}
