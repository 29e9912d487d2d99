//! Open-Meteo forecast client.

use std::time::Duration;

use reqwest::Client;
use tracing::instrument;

use crate::error::FetchError;
use crate::types::{Location, RawForecast};

const HOURLY_FIELDS: &str =
    "temperature_2m,precipitation_probability,relative_humidity_2m,weathercode";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,sunrise,sunset,\
precipitation_probability_max,weathercode";

/// Fetches the forecast for one fixed location.
#[derive(Debug, Clone)]
pub struct ForecastProvider {
    client: Client,
    api_url: String,
    location: Location,
}

impl ForecastProvider {
    /// Provider for `location` against the forecast endpoint at `api_url`.
    pub fn with_api_url(
        api_url: &str,
        location: Location,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            location,
        })
    }

    /// Query string sent with every request.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.location.latitude.to_string()),
            ("longitude", self.location.longitude.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("current_weather", "true".to_string()),
            ("timezone", self.location.timezone.clone()),
        ]
    }

    /// Issue one GET and parse the body.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self) -> Result<RawForecast, FetchError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&self.query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Forecast request returned status {}", status);
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let forecast: RawForecast = serde_json::from_str(&text)?;

        tracing::debug!(
            hours = forecast.hour_count(),
            days = forecast.day_count(),
            "Forecast parsed"
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colombo() -> Location {
        Location {
            latitude: 6.9271,
            longitude: 79.8612,
            timezone: "Asia/Colombo".to_string(),
        }
    }

    #[test]
    fn test_query_carries_fixed_fields() {
        let provider = ForecastProvider::with_api_url(
            "https://api.open-meteo.com/v1/forecast",
            colombo(),
            Duration::from_secs(10),
        )
        .unwrap();
        let query = provider.query();

        let get = |key: &str| {
            query
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(get("latitude"), "6.9271");
        assert_eq!(get("longitude"), "79.8612");
        assert_eq!(get("current_weather"), "true");
        assert_eq!(get("timezone"), "Asia/Colombo");
        assert_eq!(
            get("daily"),
            "temperature_2m_max,temperature_2m_min,sunrise,sunset,precipitation_probability_max,weathercode"
        );
    }
}
