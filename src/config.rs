//! Client and normalizer configuration
//!
//! # Environment
//!
//! [`ClientConfig::from_env`] reads:
//! - `ENERGY_CHARTS_BASE_URL` (default `https://api.energy-charts.info`)
//! - `ENERGY_CHARTS_TIMEOUT_SECS` (default `30`)

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::naming::{ColumnNameMap, NamingPolicy};

pub const DEFAULT_BASE_URL: &str = "https://api.energy-charts.info";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_BASE_URL: &str = "ENERGY_CHARTS_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "ENERGY_CHARTS_TIMEOUT_SECS";

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL without trailing endpoint
    ///
    /// Example: `https://api.energy-charts.info`
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("energy-charts-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by `lookup(name)`; lets tests avoid touching the
    /// process environment
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvValue {
                        name: ENV_TIMEOUT_SECS.to_string(),
                        value: raw.clone(),
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the base URL scheme and the timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs));
        }
        Ok(())
    }
}

/// Options for [`crate::normalizer::normalize`]
///
/// Passed explicitly into every call; there is no global lookup table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// How named series labels become column names
    pub policy: NamingPolicy,

    /// Canonical label map consulted by `Strict` and `Lenient`
    pub names: ColumnNameMap,
}

impl NormalizeConfig {
    /// Labels become column names unchanged
    pub fn verbatim() -> Self {
        Self::default()
    }

    /// Every label must be mapped
    pub fn strict(names: ColumnNameMap) -> Self {
        Self {
            policy: NamingPolicy::Strict,
            names,
        }
    }

    /// Mapped where possible, otherwise verbatim
    pub fn lenient(names: ColumnNameMap) -> Self {
        Self {
            policy: NamingPolicy::Lenient,
            names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ENERGY_CHARTS_BASE_URL", "http://localhost:8080"),
            ("ENERGY_CHARTS_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[("ENERGY_CHARTS_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("ENERGY_CHARTS_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_scheme() {
        let err = ClientConfig::from_lookup(lookup(&[("ENERGY_CHARTS_BASE_URL", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_zero_timeout_in_code_rejected() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout(0))));
    }

    #[test]
    fn test_zero_timeout_from_env_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("ENERGY_CHARTS_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(0)));
    }

    #[test]
    fn test_normalize_config_from_json() {
        let config: NormalizeConfig = serde_json::from_str(
            r#"{"policy": "strict", "names": {"Solar": "solar"}}"#,
        )
        .unwrap();
        assert_eq!(config.policy, NamingPolicy::Strict);
        assert_eq!(config.names.get("Solar"), Some("solar"));
    }

    #[test]
    fn test_normalize_config_default_is_verbatim() {
        assert_eq!(NormalizeConfig::default().policy, NamingPolicy::Verbatim);
    }
}
