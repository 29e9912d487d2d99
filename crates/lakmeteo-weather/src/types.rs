use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Unmodified Open-Meteo response for one location and request window.
///
/// Every section is optional and every series defaults to empty, so a
/// partial body still parses; the normalizer turns gaps into empty views.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    #[serde(default)]
    pub current_weather: Option<CurrentConditions>,
    #[serde(default)]
    pub hourly: Option<HourlySeries>,
    #[serde(default)]
    pub daily: Option<DailySeries>,
}

impl RawForecast {
    /// Number of hourly timestamps, 0 when the section is missing.
    pub fn hour_count(&self) -> usize {
        self.hourly.as_ref().map_or(0, |h| h.time.len())
    }

    /// Number of forecast days, 0 when the section is missing.
    pub fn day_count(&self) -> usize {
        self.daily.as_ref().map_or(0, |d| d.time.len())
    }
}

/// `current_weather` block
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    /// °C
    pub temperature: f64,
    /// km/h
    #[serde(alias = "wind_speed")]
    pub windspeed: f64,
    #[serde(default, alias = "wind_direction")]
    pub winddirection: Option<f64>,
    #[serde(alias = "weather_code")]
    pub weathercode: i32,
    #[serde(default)]
    pub is_day: Option<u8>,
    #[serde(deserialize_with = "crate::local_time::deserialize")]
    pub time: NaiveDateTime,
}

/// Index-aligned hourly sequences.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HourlySeries {
    #[serde(default, deserialize_with = "crate::local_time::deserialize_vec")]
    pub time: Vec<NaiveDateTime>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Vec<Option<i32>>,
}

impl HourlySeries {
    /// Record at `index`. Values missing from a shorter parallel
    /// sequence come back as `None`.
    pub fn entry(&self, index: usize) -> Option<HourlyEntry> {
        let time = *self.time.get(index)?;
        Some(HourlyEntry {
            time,
            temperature: value_at(&self.temperature_2m, index),
            precipitation_probability: value_at(&self.precipitation_probability, index),
            relative_humidity: value_at(&self.relative_humidity_2m, index),
            weather_code: value_at(&self.weathercode, index),
        })
    }
}

/// Index-aligned daily sequences.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<NaiveDate>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "crate::local_time::deserialize_opt_vec")]
    pub sunrise: Vec<Option<NaiveDateTime>>,
    #[serde(default, deserialize_with = "crate::local_time::deserialize_opt_vec")]
    pub sunset: Vec<Option<NaiveDateTime>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Vec<Option<i32>>,
}

impl DailySeries {
    pub fn entry(&self, index: usize) -> Option<DailyEntry> {
        let date = *self.time.get(index)?;
        Some(DailyEntry {
            date,
            temperature_max: value_at(&self.temperature_2m_max, index),
            temperature_min: value_at(&self.temperature_2m_min, index),
            sunrise: value_at(&self.sunrise, index),
            sunset: value_at(&self.sunset, index),
            precipitation_probability_max: value_at(&self.precipitation_probability_max, index),
            weather_code: value_at(&self.weathercode, index),
        })
    }
}

/// One hour of the forecast, gathered from the parallel sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyEntry {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub weather_code: Option<i32>,
}

/// One forecast day, gathered from the parallel sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub precipitation_probability_max: Option<f64>,
    pub weather_code: Option<i32>,
}

fn value_at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

/// Location the provider requests forecasts for
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone, or `auto`
    pub timezone: String,
}
