//! Endpoint catalogue for the Energy-Charts API
//!
//! Turns typed parameters into one [`ApiRequest`] per HTTP GET.
//!
//! # Parameters
//!
//! - Countries, bidding zones, regions and the other enumerations below are
//!   static configuration; their `as_str()` value is what goes on the wire.
//! - `start` / `end` accept anything the API accepts: ISO 8601
//!   (`2024-01-01T17:00Z`, `2024-01-01T18:00+01:00`), a date (`2024-01-01`)
//!   or a unix timestamp (`1704063600`).
//! - Optional parameters that are `None` are left out of the query string.
//!
//! # Example
//!
//! ```rust
//! use energy_charts::endpoints::*;
//!
//! let request = ApiRequest::price(BiddingZone::DeLu, "2024-01-01", "2024-01-02");
//! let url = request.url("https://api.energy-charts.info").unwrap();
//! assert_eq!(
//!     url.as_str(),
//!     "https://api.energy-charts.info/price?bzn=DE-LU&start=2024-01-01&end=2024-01-02"
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Declares a wire-value enum with `as_str`, `ALL`, `Display` and `FromStr`
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Value sent to the API
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ConfigError::UnknownValue {
                        kind: stringify!($name).to_string(),
                        value: s.to_string(),
                    })
            }
        }
    };
}

// ============================================================================
// Enumerations
// ============================================================================

wire_enum! {
    /// API endpoints (path segment after the base URL)
    Endpoint {
        PublicPower => "public_power",
        PublicPowerForecast => "public_power_forecast",
        TotalPower => "total_power",
        InstalledPower => "installed_power",
        Frequency => "frequency",
        /// Cross-border electricity trading
        Cbet => "cbet",
        /// Cross-border physical flows
        Cbpf => "cbpf",
        Price => "price",
        /// Renewable share traffic light
        Signal => "signal",
        RenShareForecast => "ren_share_forecast",
        RenShareDailyAvg => "ren_share_daily_avg",
        SolarShare => "solar_share",
        SolarShareDailyAvg => "solar_share_daily_avg",
        WindOnshoreShare => "wind_onshore_share",
        WindOnshoreShareDailyAvg => "wind_onshore_share_daily_avg",
        WindOffshoreShare => "wind_offshore_share",
        WindOffshoreShareDailyAvg => "wind_offshore_share_daily_avg",
    }
}

wire_enum! {
    /// Public power subtypes
    SubType {
        /// Only available for Switzerland
        Solarlog => "solarlog",
    }
}

wire_enum! {
    /// Production types for the public power forecast
    ProductionType {
        Solar => "solar",
        WindOnshore => "wind_onshore",
        WindOffshore => "wind_offshore",
        Load => "load",
    }
}

wire_enum! {
    ForecastType {
        Current => "current",
        Intraday => "intraday",
        DayAhead => "day-ahead",
    }
}

wire_enum! {
    /// Granularity of installed power data (monthly only for Germany)
    TimeStep {
        Yearly => "yearly",
        Monthly => "monthly",
    }
}

wire_enum! {
    /// Synchronous grids (currently only Continental Europe)
    Region {
        Ucte => "UCTE",
    }
}

wire_enum! {
    Country {
        Albania => "al",
        Armenia => "am",
        Austria => "at",
        Azerbaijan => "az",
        Belarus => "by",
        Belgium => "be",
        BosniaHerzegovina => "ba",
        Cyprus => "cy",
        CzechRepublic => "cz",
        Denmark => "dk",
        Estonia => "ee",
        European => "eu",
        Finland => "fi",
        France => "fr",
        Georgia => "ge",
        Germany => "de",
        Greece => "gr",
        Croatia => "hr",
        Hungary => "hu",
        Ireland => "ie",
        Italy => "it",
        Kosovo => "xk",
        Latvia => "lv",
        Lithuania => "lt",
        Luxembourg => "lu",
        Malta => "mt",
        Moldova => "md",
        Montenegro => "me",
        Netherlands => "nl",
        NorthIreland => "nie",
        NorthMacedonia => "mk",
        Norway => "no",
        Poland => "pl",
        Portugal => "pt",
        Romania => "ro",
        Russia => "ru",
        Serbia => "rs",
        SlovakRepublic => "sk",
        Slovenia => "sl",
        Spain => "es",
        Sweden => "se",
        Switzerland => "ch",
        Turkey => "tr",
        Ukraine => "ua",
        UnitedKingdom => "uk",
        AllEurope => "all",
    }
}

wire_enum! {
    /// Day-ahead market bidding zones
    BiddingZone {
        At => "AT",
        Be => "BE",
        Ch => "CH",
        Cz => "CZ",
        DeLu => "DE-LU",
        DeAtLu => "DE-AT-LU",
        Dk1 => "DK1",
        Dk2 => "DK2",
        Fr => "FR",
        Hu => "HU",
        ItNorth => "IT-North",
        Nl => "NL",
        No2 => "NO2",
        Pl => "PL",
        Se4 => "SE4",
        Si => "SI",
    }
}

// ============================================================================
// Request
// ============================================================================

/// One HTTP GET against the API
///
/// Built through the typed constructors below; `params` holds only the
/// parameters that were actually supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Endpoint path segment
    pub endpoint: Endpoint,

    /// Query parameters in call order
    pub params: Vec<(String, String)>,

    /// Period granularity the caller asked for (installed power only)
    ///
    /// Checked against the labels in the response instead of being trusted.
    pub expected_time_step: Option<TimeStep>,
}

impl ApiRequest {
    /// Start a request for `endpoint` with no parameters
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
            expected_time_step: None,
        }
    }

    /// Add a parameter
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Add a parameter only when a value is present
    pub fn optional_param(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Full request URL with the query string encoded
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - URL ready for HTTP GET
    /// * `Err(ConfigError::InvalidBaseUrl)` - If `base_url` cannot be parsed
    pub fn url(&self, base_url: &str) -> Result<reqwest::Url, ConfigError> {
        let raw = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.endpoint.as_str()
        );
        // parse_with_params leaves a dangling '?' for an empty pair list
        let parsed = if self.params.is_empty() {
            reqwest::Url::parse(&raw)
        } else {
            let pairs = self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
            reqwest::Url::parse_with_params(&raw, pairs)
        };
        parsed.map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))
    }

    // ------------------------------------------------------------------------
    // Power
    // ------------------------------------------------------------------------

    /// Public net electricity production per production type
    ///
    /// Response: `unix_seconds`, `production_types[{name, data}]`, `deprecated`
    pub fn public_power(
        country: Country,
        start: &str,
        end: &str,
        subtype: Option<SubType>,
    ) -> Self {
        Self::new(Endpoint::PublicPower)
            .param("country", country.as_str())
            .param("start", start)
            .param("end", end)
            .optional_param("subtype", subtype.map(|s| s.as_str()))
    }

    /// Forecast of public net production for one production type
    ///
    /// Response: `unix_seconds`, `forecast_values`, `production_type`,
    /// `forecast_type`, `deprecated`
    pub fn public_power_forecast(
        country: Country,
        production_type: ProductionType,
        forecast_type: ForecastType,
        start: &str,
        end: &str,
    ) -> Self {
        Self::new(Endpoint::PublicPowerForecast)
            .param("country", country.as_str())
            .param("production_type", production_type.as_str())
            .param("forecast_type", forecast_type.as_str())
            .param("start", start)
            .param("end", end)
    }

    /// Total net production including industrial self supply
    pub fn total_power(country: Country, start: &str, end: &str) -> Self {
        Self::new(Endpoint::TotalPower)
            .param("country", country.as_str())
            .param("start", start)
            .param("end", end)
    }

    /// Installed power in GW (battery storage in GWh)
    ///
    /// With `installation_decommission` the net installation/decommission
    /// numbers are returned instead of totals. Response: `time`,
    /// `production_types[{name, data}]`, `deprecated`.
    pub fn installed_power(
        country: Country,
        time_step: TimeStep,
        installation_decommission: bool,
    ) -> Self {
        let mut request = Self::new(Endpoint::InstalledPower)
            .param("country", country.as_str())
            .param("time_step", time_step.as_str())
            .param(
                "installation_decommission",
                installation_decommission.to_string(),
            );
        request.expected_time_step = Some(time_step);
        request
    }

    /// Grid frequency measured in Freiburg
    pub fn frequency(region: Region, start: &str, end: &str) -> Self {
        Self::new(Endpoint::Frequency)
            .param("region", region.as_str())
            .param("start", start)
            .param("end", end)
    }

    // ------------------------------------------------------------------------
    // Import / export
    // ------------------------------------------------------------------------

    /// Cross-border electricity trading in GW (positive = import)
    ///
    /// Response: `unix_seconds`, `countries[{name, data}]`, `deprecated`
    pub fn cbet(country: Country, start: &str, end: &str) -> Self {
        Self::new(Endpoint::Cbet)
            .param("country", country.as_str())
            .param("start", start)
            .param("end", end)
    }

    /// Cross-border physical flows in GW (positive = import)
    pub fn cbpf(country: Country, start: &str, end: &str) -> Self {
        Self::new(Endpoint::Cbpf)
            .param("country", country.as_str())
            .param("start", start)
            .param("end", end)
    }

    // ------------------------------------------------------------------------
    // Price
    // ------------------------------------------------------------------------

    /// Day-ahead spot price in EUR/MWh
    ///
    /// Response: `license_info`, `unix_seconds`, `price`, `unit`, `deprecated`
    pub fn price(bzn: BiddingZone, start: &str, end: &str) -> Self {
        Self::new(Endpoint::Price)
            .param("bzn", bzn.as_str())
            .param("start", start)
            .param("end", end)
    }

    // ------------------------------------------------------------------------
    // Renewable share
    // ------------------------------------------------------------------------

    /// Renewable share of load and traffic light signal
    ///
    /// Signal values: -1 red (grid congestion), 0 red (low share),
    /// 1 yellow, 2 green.
    pub fn signal(country: Country, postal_code: Option<&str>) -> Self {
        Self::new(Endpoint::Signal)
            .param("country", country.as_str())
            .optional_param("postal_code", postal_code)
    }

    pub fn ren_share_forecast(country: Country) -> Self {
        Self::new(Endpoint::RenShareForecast).param("country", country.as_str())
    }

    /// Daily average renewable share for `year` (`-1` = last year)
    ///
    /// Response: `days` (`dd.mm.yyyy`), `data`, `deprecated`
    pub fn ren_share_daily_avg(country: Country, year: i32) -> Self {
        Self::daily_avg(Endpoint::RenShareDailyAvg, country, year)
    }

    pub fn solar_share(country: Country) -> Self {
        Self::new(Endpoint::SolarShare).param("country", country.as_str())
    }

    pub fn solar_share_daily_avg(country: Country, year: i32) -> Self {
        Self::daily_avg(Endpoint::SolarShareDailyAvg, country, year)
    }

    pub fn wind_onshore_share(country: Country) -> Self {
        Self::new(Endpoint::WindOnshoreShare).param("country", country.as_str())
    }

    pub fn wind_onshore_share_daily_avg(country: Country, year: i32) -> Self {
        Self::daily_avg(Endpoint::WindOnshoreShareDailyAvg, country, year)
    }

    pub fn wind_offshore_share(country: Country) -> Self {
        Self::new(Endpoint::WindOffshoreShare).param("country", country.as_str())
    }

    pub fn wind_offshore_share_daily_avg(country: Country, year: i32) -> Self {
        Self::daily_avg(Endpoint::WindOffshoreShareDailyAvg, country, year)
    }

    fn daily_avg(endpoint: Endpoint, country: Country, year: i32) -> Self {
        Self::new(endpoint)
            .param("country", country.as_str())
            .param("year", year.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.energy-charts.info";

    #[test]
    fn test_public_power_omits_missing_subtype() {
        let request = ApiRequest::public_power(Country::Germany, "2024-01-01", "2024-01-02", None);
        let url = request.url(BASE).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.energy-charts.info/public_power?country=de&start=2024-01-01&end=2024-01-02"
        );
    }

    #[test]
    fn test_public_power_with_subtype() {
        let request = ApiRequest::public_power(
            Country::Switzerland,
            "2024-01-01",
            "2024-01-02",
            Some(SubType::Solarlog),
        );
        assert_eq!(
            request.params.last(),
            Some(&("subtype".to_string(), "solarlog".to_string()))
        );
    }

    #[test]
    fn test_query_values_are_encoded() {
        let request = ApiRequest::total_power(Country::France, "2024-01-01T18:00+01:00", "2024-01-02");
        let url = request.url(BASE).unwrap();
        assert!(url.as_str().contains("start=2024-01-01T18%3A00%2B01%3A00"));
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let request = ApiRequest::ren_share_forecast(Country::Austria);
        let url = request.url("https://api.energy-charts.info/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.energy-charts.info/ren_share_forecast?country=at"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let request = ApiRequest::ren_share_forecast(Country::Austria);
        assert!(matches!(
            request.url("not a url"),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_installed_power_records_time_step() {
        let request = ApiRequest::installed_power(Country::Germany, TimeStep::Monthly, true);
        assert_eq!(request.expected_time_step, Some(TimeStep::Monthly));
        assert!(request
            .params
            .contains(&("installation_decommission".to_string(), "true".to_string())));
    }

    #[test]
    fn test_signal_without_postal_code() {
        let request = ApiRequest::signal(Country::Germany, None);
        assert_eq!(request.params.len(), 1);
    }

    #[test]
    fn test_daily_avg_last_year() {
        let request = ApiRequest::solar_share_daily_avg(Country::Spain, -1);
        assert_eq!(request.endpoint, Endpoint::SolarShareDailyAvg);
        assert!(request.params.contains(&("year".to_string(), "-1".to_string())));
    }

    #[test]
    fn test_enum_from_str_case_insensitive() {
        assert_eq!("DE".parse::<Country>().unwrap(), Country::Germany);
        assert_eq!("de-lu".parse::<BiddingZone>().unwrap(), BiddingZone::DeLu);
        assert_eq!("day-ahead".parse::<ForecastType>().unwrap(), ForecastType::DayAhead);
        assert!("atlantis".parse::<Country>().is_err());
    }

    #[test]
    fn test_unknown_wire_value_is_typed_error() {
        match "DE-XX".parse::<BiddingZone>() {
            Err(ConfigError::UnknownValue { kind, value }) => {
                assert_eq!(kind, "BiddingZone");
                assert_eq!(value, "DE-XX");
            }
            other => panic!("Expected UnknownValue, got {:?}", other),
        }
    }

    #[test]
    fn test_wire_values_unique() {
        let mut seen = std::collections::HashSet::new();
        for country in Country::ALL {
            assert!(seen.insert(country.as_str()), "duplicate {}", country);
        }
        assert_eq!(Endpoint::ALL.len(), 17);
    }
}
