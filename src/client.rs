//! Blocking HTTP client for the Energy-Charts API
//!
//! One [`ApiRequest`] → one GET → one decoded JSON value. There is no retry,
//! caching or pagination; each call either succeeds or returns the upstream
//! error.
//!
//! # Status mapping
//!
//! - 200 → decoded JSON body
//! - 422 → [`ApiError::Validation`] (wrong parameter value or range)
//! - anything else → [`ApiError::Request`]
//!
//! # Example
//!
//! ```no_run
//! use energy_charts::{ApiRequest, BiddingZone, ClientConfig, EnergyChartsClient, Fetcher, NormalizeConfig};
//!
//! let client = EnergyChartsClient::new(ClientConfig::default())?;
//! let request = ApiRequest::price(BiddingZone::DeLu, "2024-01-01", "2024-01-02");
//! let table = client.fetch_table(&request, &NormalizeConfig::verbatim())?;
//! println!("{} hourly prices", table.len());
//! # Ok::<(), energy_charts::EnergyChartsError>(())
//! ```

use std::time::Duration;

use serde_json::Value;

use crate::config::{ClientConfig, NormalizeConfig};
use crate::endpoints::ApiRequest;
use crate::error::{ApiError, ConfigError, EnergyChartsError};
use crate::normalizer::normalize;
use crate::response::Response;
use crate::types::Table;

/// Source of decoded API responses
///
/// [`EnergyChartsClient`] is the HTTP implementation; tests and offline
/// callers can provide their own.
pub trait Fetcher {
    /// Perform the request and return the decoded JSON body
    fn fetch(&self, request: &ApiRequest) -> Result<Value, EnergyChartsError>;

    /// Fetch and validate the response schema
    ///
    /// Installed power requests also check that the period labels match the
    /// requested time step.
    fn fetch_response(&self, request: &ApiRequest) -> Result<Response, EnergyChartsError> {
        let response = Response::from_value(self.fetch(request)?)?;
        match request.expected_time_step {
            Some(step) => Ok(response.with_time_step(step)?),
            None => Ok(response),
        }
    }

    /// Fetch, validate and normalize into a table
    fn fetch_table(
        &self,
        request: &ApiRequest,
        config: &NormalizeConfig,
    ) -> Result<Table, EnergyChartsError> {
        let response = self.fetch_response(request)?;
        Ok(normalize(&response, config)?)
    }
}

/// HTTP client for `https://api.energy-charts.info`
#[derive(Debug, Clone)]
pub struct EnergyChartsClient {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl EnergyChartsClient {
    /// Build a client from validated configuration
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Client configured from `ENERGY_CHARTS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Fetcher for EnergyChartsClient {
    fn fetch(&self, request: &ApiRequest) -> Result<Value, EnergyChartsError> {
        let url = request.url(&self.config.base_url)?;
        log::info!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| {
                log::warn!("{} request failed: {}", request.endpoint, e);
                ApiError::from(e)
            })?;

        let status = response.status().as_u16();
        log::debug!("{} responded with HTTP {}", request.endpoint, status);

        let body = response.text().map_err(ApiError::from)?;
        Ok(classify_response(status, &body)?)
    }
}

/// Map an HTTP status and body to a decoded value or an [`ApiError`]
///
/// # Examples
///
/// ```
/// # use energy_charts::client::classify_response;
/// # use energy_charts::ApiError;
/// assert!(classify_response(200, r#"{"unix_seconds": []}"#).is_ok());
/// assert!(matches!(
///     classify_response(422, "bad country"),
///     Err(ApiError::Validation { .. })
/// ));
/// assert!(matches!(
///     classify_response(500, "boom"),
///     Err(ApiError::Request { status: 500, .. })
/// ));
/// ```
pub fn classify_response(status: u16, body: &str) -> Result<Value, ApiError> {
    match status {
        200 => serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string())),
        422 => Err(ApiError::Validation {
            body: body.to_string(),
        }),
        _ => Err(ApiError::Request {
            status,
            body: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::{BiddingZone, Country, TimeStep};
    use crate::error::NormalizeError;
    use crate::naming::ColumnNameMap;
    use crate::types::Cell;
    use serde_json::json;
    use std::cell::RefCell;

    /// Replays a canned body and records requests
    struct CannedFetcher {
        body: Value,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl CannedFetcher {
        fn new(body: Value) -> Self {
            Self {
                body,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetcher for CannedFetcher {
        fn fetch(&self, request: &ApiRequest) -> Result<Value, EnergyChartsError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(self.body.clone())
        }
    }

    struct RejectingFetcher;

    impl Fetcher for RejectingFetcher {
        fn fetch(&self, _request: &ApiRequest) -> Result<Value, EnergyChartsError> {
            Err(classify_response(422, "start: invalid date").unwrap_err().into())
        }
    }

    // ========================================================================
    // Status mapping
    // ========================================================================

    #[test]
    fn test_validation_error_keeps_upstream_message() {
        match classify_response(422, r#"{"detail": "bzn must be one of ..."}"#) {
            Err(ApiError::Validation { body }) => assert!(body.contains("bzn must be one of")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_is_request_error() {
        match classify_response(404, "Not Found") {
            Err(ApiError::Request { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "Not Found");
            }
            other => panic!("Expected Request error, got {:?}", other),
        }
    }

    #[test]
    fn test_other_success_codes_are_errors() {
        assert!(matches!(
            classify_response(204, ""),
            Err(ApiError::Request { status: 204, .. })
        ));
    }

    #[test]
    fn test_invalid_json_body() {
        assert!(matches!(
            classify_response(200, "<html>"),
            Err(ApiError::Decode(_))
        ));
    }

    // ========================================================================
    // Fetcher pipeline
    // ========================================================================

    #[test]
    fn test_fetch_table_normalizes() {
        let fetcher = CannedFetcher::new(json!({
            "license_info": "CC BY 4.0",
            "unix_seconds": [0, 3600],
            "price": [10.5, null],
            "unit": "EUR/MWh",
            "deprecated": false
        }));
        let request = ApiRequest::price(BiddingZone::DeLu, "1970-01-01", "1970-01-02");

        let table = fetcher
            .fetch_table(&request, &NormalizeConfig::verbatim())
            .unwrap();

        assert_eq!(
            table.columns(),
            ["timestamp", "license_info", "price", "unit", "deprecated"]
        );
        assert_eq!(table.row(1).unwrap().get("price"), Some(&Cell::NoValue));
        assert_eq!(fetcher.seen.borrow().len(), 1);
    }

    #[test]
    fn test_fetch_table_strict_naming_error() {
        let fetcher = CannedFetcher::new(json!({
            "unix_seconds": [0],
            "production_types": [{"name": "Unknown Type", "data": [1.0]}]
        }));
        let request = ApiRequest::public_power(Country::Germany, "2024-01-01", "2024-01-02", None);

        let err = fetcher
            .fetch_table(&request, &NormalizeConfig::strict(ColumnNameMap::production_types()))
            .unwrap_err();

        assert!(matches!(
            err,
            EnergyChartsError::Normalize(NormalizeError::UnmappedColumnName(label)) if label == "Unknown Type"
        ));
    }

    #[test]
    fn test_installed_power_time_step_checked() {
        let fetcher = CannedFetcher::new(json!({
            "time": ["2022", "2023"],
            "production_types": [{"name": "Solar", "data": [66.5, 81.7]}]
        }));
        let request = ApiRequest::installed_power(Country::Germany, TimeStep::Monthly, false);

        let err = fetcher.fetch_response(&request).unwrap_err();
        assert!(matches!(
            err,
            EnergyChartsError::Normalize(NormalizeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_api_errors_propagate_untouched() {
        let request = ApiRequest::ren_share_forecast(Country::Germany);
        let err = RejectingFetcher
            .fetch_table(&request, &NormalizeConfig::verbatim())
            .unwrap_err();
        assert!(matches!(err, EnergyChartsError::Api(ApiError::Validation { .. })));
    }

    // ========================================================================
    // HTTP client
    // ========================================================================

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = ClientConfig {
            base_url: "api.energy-charts.info".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            EnergyChartsClient::new(config),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        let client = EnergyChartsClient::new(ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ClientConfig::default()
        })
        .unwrap();

        let err = client
            .fetch(&ApiRequest::ren_share_forecast(Country::Germany))
            .unwrap_err();
        assert!(matches!(err, EnergyChartsError::Api(ApiError::Network(_))));
    }
}
