use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Colombo, Sri Lanka
pub const DEFAULT_LOCATION_NAME: &str = "Colombo, Sri Lanka";
pub const DEFAULT_LATITUDE: f64 = 6.9271;
pub const DEFAULT_LONGITUDE: f64 = 79.8612;
pub const DEFAULT_TIMEZONE: &str = "Asia/Colombo";

pub const DEFAULT_API_URL: &str = "https://api.open-meteo.com/v1/forecast";
/// Auto-refresh every 10 minutes
pub const DEFAULT_REFRESH_SECONDS: u64 = 600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Dashboard configuration.
///
/// Every value has a compiled-in default; nothing is read from disk.
/// `from_toml_str` exists so tests and embedders can point the
/// dashboard at another endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// The single location the dashboard tracks
    #[serde(default)]
    pub location: LocationConfig,

    /// Forecast API and refresh settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Display name shown on the current conditions card
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone sent to the API so timestamps come back location-local
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOCATION_NAME.to_string(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Forecast endpoint
    pub api_url: String,

    /// Refresh interval in seconds
    pub refresh_seconds: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_seconds: DEFAULT_REFRESH_SECONDS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate the configuration and fail on errors, logging any warnings.
    pub fn validated(self) -> Result<(Self, ValidationResult), ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.api_url, "weather.api_url", &mut result);

        if !(-90.0..=90.0).contains(&self.location.latitude) {
            result.add_error(
                "location.latitude",
                format!("Latitude out of range: {}", self.location.latitude),
            );
        }

        if !(-180.0..=180.0).contains(&self.location.longitude) {
            result.add_error(
                "location.longitude",
                format!("Longitude out of range: {}", self.location.longitude),
            );
        }

        if self.location.timezone.trim().is_empty() {
            result.add_error("location.timezone", "Timezone must not be empty");
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.weather.refresh_seconds == 0 {
            result.add_warning(
                "weather.refresh_seconds",
                "Automatic refresh disabled (0 seconds)",
            );
        } else if self.weather.refresh_seconds > 86_400 {
            result.add_warning(
                "weather.refresh_seconds",
                "Weather refresh interval is more than 24 hours",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_defaults_are_colombo() {
        let config = Config::default();
        assert_eq!(config.location.latitude, 6.9271);
        assert_eq!(config.location.longitude, 79.8612);
        assert_eq!(config.location.timezone, "Asia/Colombo");
        assert_eq!(config.weather.refresh_seconds, 600);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.api_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.api_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.api_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let mut config = Config::default();
        config.location.latitude = 91.0;
        config.location.longitude = -181.0;
        let result = config.validate();
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_zero_refresh_is_warning() {
        let mut config = Config::default();
        config.weather.refresh_seconds = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.refresh_seconds"));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.weather.request_timeout_secs = 0;
        match config.validated() {
            Err(ConfigError::Invalid(summary)) => {
                assert!(summary.contains("weather.request_timeout_secs"))
            }
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [weather]
            api_url = "http://127.0.0.1:9000/v1/forecast"
            "#,
        )
        .unwrap();
        assert_eq!(config.weather.api_url, "http://127.0.0.1:9000/v1/forecast");
        assert_eq!(config.weather.refresh_seconds, DEFAULT_REFRESH_SECONDS);
        assert_eq!(config.location.name, DEFAULT_LOCATION_NAME);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(matches!(
            Config::from_toml_str("[weather\napi_url = "),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
