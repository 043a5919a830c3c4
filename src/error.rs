//! Error types for the Energy-Charts client
//!
//! Covers every failure mode of the crate:
//! - Normalization errors (structurally unusable responses, unmapped labels)
//! - HTTP API errors (validation rejects, unexpected status codes, transport)
//! - Configuration errors (base URL, timeout, name map files, unknown enum values)
//! - Export errors (CSV output)

use thiserror::Error;

/// Top-level error type for the crate
///
/// Supports automatic conversion from the specific error types via `From`
#[derive(Debug, Error)]
pub enum EnergyChartsError {
    /// Response could not be turned into a table
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// HTTP API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid client or normalizer configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Table could not be written out
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Normalization errors
///
/// Raised while validating a decoded response or building a table from it.
/// The normalizer never recovers locally; these reach the caller as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// Response is empty, not an object, or has no recognizable series
    ///
    /// Example: `{}` or `{"deprecated": false}`
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A named series label has no entry in the canonical name map (strict mode)
    ///
    /// Example: `"Unknown Type"` when the map only knows production types
    #[error("Unmapped column name: '{0}' (extend the canonical name map)")]
    UnmappedColumnName(String),
}

impl NormalizeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        NormalizeError::InvalidResponse(msg.into())
    }
}

/// HTTP API errors
///
/// Occurs during communication with the Energy-Charts API. Both upstream
/// variants carry the raw upstream message.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Upstream rejected a parameter value or range (HTTP 422)
    #[error("Validation error: {body}")]
    Validation { body: String },

    /// Any other non-success status
    ///
    /// Common codes:
    /// - 400: Bad request
    /// - 404: Unknown endpoint
    /// - 500: Server error
    #[error("Request error (HTTP {status}): {body}")]
    Request { status: u16, body: String },

    /// Network error (connection refused, DNS failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Success body was not valid JSON
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Base URL is empty or not http(s)
    #[error("Invalid base URL: '{0}' (expected http:// or https://)")]
    InvalidBaseUrl(String),

    /// Environment variable holds an unusable value
    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnvValue { name: String, value: String },

    /// Request timeout must be at least one second
    #[error("Invalid timeout: {0}s (must be at least 1)")]
    InvalidTimeout(u64),

    /// Text does not name any value of a wire enumeration
    ///
    /// Example: `"atlantis"` parsed as a `Country`
    #[error("Unknown {kind}: '{value}'")]
    UnknownValue { kind: String, value: String },

    /// Canonical name map could not be read or parsed
    #[error("Invalid column name map: {0}")]
    InvalidNameMap(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Table export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failed (I/O or encoding)
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Writer output could not be recovered as a string
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(String),
}
