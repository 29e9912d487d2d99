//! Pure reshaping of a [`RawForecast`] into chart and card views.
//!
//! Nothing here fails or mutates its input: missing sections produce empty
//! sequences, missing values stay `None`. Views are rebuilt on every call;
//! the input is at most 7 days of hourly data.

use chrono::{NaiveDate, Timelike};

use crate::codes::{self, WeatherInfo};
use crate::types::{DailyEntry, HourlyEntry, RawForecast};

pub const HOURS_PER_DAY: usize = 24;

/// Selected when today's date is not in the forecast window. This labels
/// whatever day comes first as the selected day, which may not be today.
pub const FALLBACK_DAY_INDEX: usize = 0;

/// Padding applied on each side of the hourly temperature axis, °C.
const TEMPERATURE_AXIS_PADDING: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyChartPoint {
    /// `H:00`, 24-hour local clock
    pub label: String,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyChartPoint {
    /// Short weekday name, e.g. `Mon`
    pub label: String,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub precipitation_max: Option<f64>,
}

/// Current conditions card
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentCard {
    /// Rounded °C
    pub temperature: i64,
    /// km/h
    pub wind_speed: f64,
    /// `HH:MM` of the observation
    pub time_label: String,
    pub icon: &'static str,
    pub description: &'static str,
}

/// One card of the 7-day strip
#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub date: NaiveDate,
    pub label: String,
    pub max: Option<i64>,
    pub min: Option<i64>,
    pub precipitation_max: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub icon: &'static str,
    pub description: &'static str,
}

/// One row of the selected day's hourly list
#[derive(Debug, Clone, PartialEq)]
pub struct HourCard {
    pub label: String,
    pub entry: HourlyEntry,
    pub icon: &'static str,
    pub description: &'static str,
}

/// Everything the presentation layer renders for one forecast and one
/// selected day.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub current: Option<CurrentCard>,
    pub hourly_chart_points: Vec<HourlyChartPoint>,
    pub temperature_domain: Option<(f64, f64)>,
    pub daily_chart_points: Vec<DailyChartPoint>,
    pub day_cards: Vec<DayCard>,
    pub selected_day: usize,
    pub selected_day_hourly_points: Vec<HourCard>,
}

/// One chart point per hourly timestamp, in source order.
///
/// The iterator borrows `raw`; call again for a fresh pass.
pub fn hourly_chart_points(raw: &RawForecast) -> impl Iterator<Item = HourlyChartPoint> + '_ {
    raw.hourly.iter().flat_map(|hourly| {
        hourly.time.iter().enumerate().map(move |(i, time)| HourlyChartPoint {
            label: hour_label(time.hour()),
            temperature: hourly.temperature_2m.get(i).copied().flatten(),
        })
    })
}

/// One chart point per forecast day, in source order.
pub fn daily_chart_points(raw: &RawForecast) -> impl Iterator<Item = DailyChartPoint> + '_ {
    daily_entries(raw).map(|day| DailyChartPoint {
        label: weekday_label(day.date),
        max: day.temperature_max,
        min: day.temperature_min,
        precipitation_max: day.precipitation_probability_max,
    })
}

/// Index of the first day whose date is `today`, or [`FALLBACK_DAY_INDEX`].
pub fn selected_day_index(raw: &RawForecast, today: NaiveDate) -> usize {
    raw.daily
        .as_ref()
        .and_then(|daily| daily.time.iter().position(|date| *date == today))
        .unwrap_or(FALLBACK_DAY_INDEX)
}

/// The hourly entries `[day_index * 24, day_index * 24 + 24)`.
///
/// Returns fewer than 24 entries (possibly none) when the hourly series
/// stops early. Never pads.
pub fn slice_hourly_for_day(raw: &RawForecast, day_index: usize) -> Vec<HourlyEntry> {
    let Some(hourly) = raw.hourly.as_ref() else {
        return Vec::new();
    };
    let Some(start) = day_index.checked_mul(HOURS_PER_DAY) else {
        return Vec::new();
    };
    let end = start.saturating_add(HOURS_PER_DAY).min(hourly.time.len());

    (start..end).filter_map(|i| hourly.entry(i)).collect()
}

/// Y-axis bounds for the hourly temperature chart, padded by 2 °C.
pub fn temperature_domain(raw: &RawForecast) -> Option<(f64, f64)> {
    hourly_chart_points(raw)
        .filter_map(|p| p.temperature)
        .fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
        .map(|(lo, hi)| (lo - TEMPERATURE_AXIS_PADDING, hi + TEMPERATURE_AXIS_PADDING))
}

/// Build the full view for `selected_day`.
pub fn derive_view(raw: &RawForecast, selected_day: usize) -> DerivedView {
    DerivedView {
        current: current_card(raw),
        hourly_chart_points: hourly_chart_points(raw).collect(),
        temperature_domain: temperature_domain(raw),
        daily_chart_points: daily_chart_points(raw).collect(),
        day_cards: daily_entries(raw).map(day_card).collect(),
        selected_day,
        selected_day_hourly_points: slice_hourly_for_day(raw, selected_day)
            .into_iter()
            .map(hour_card)
            .collect(),
    }
}

fn daily_entries(raw: &RawForecast) -> impl Iterator<Item = DailyEntry> + '_ {
    raw.daily
        .iter()
        .flat_map(|daily| (0..daily.time.len()).filter_map(move |i| daily.entry(i)))
}

fn current_card(raw: &RawForecast) -> Option<CurrentCard> {
    let current = raw.current_weather.as_ref()?;
    let WeatherInfo { icon, description } = codes::lookup(current.weathercode);
    Some(CurrentCard {
        temperature: round_temperature(current.temperature),
        wind_speed: current.windspeed,
        time_label: current.time.format("%H:%M").to_string(),
        icon,
        description,
    })
}

fn day_card(day: DailyEntry) -> DayCard {
    let WeatherInfo { icon, description } = codes::lookup_opt(day.weather_code);
    DayCard {
        date: day.date,
        label: weekday_label(day.date),
        max: day.temperature_max.map(round_temperature),
        min: day.temperature_min.map(round_temperature),
        precipitation_max: day.precipitation_probability_max,
        sunrise: day.sunrise.map(|t| t.format("%H:%M").to_string()),
        sunset: day.sunset.map(|t| t.format("%H:%M").to_string()),
        icon,
        description,
    }
}

fn hour_card(entry: HourlyEntry) -> HourCard {
    let WeatherInfo { icon, description } = codes::lookup_opt(entry.weather_code);
    HourCard {
        label: hour_label(entry.time.hour()),
        entry,
        icon,
        description,
    }
}

fn hour_label(hour: u32) -> String {
    format!("{}:00", hour)
}

fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

fn round_temperature(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CurrentConditions, DailySeries, HourlySeries};
    use chrono::{Duration, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// `days` full days of hourly data starting Monday 2024-06-03.
    fn forecast(days: usize, hours: usize) -> RawForecast {
        let first_day = start().date();
        RawForecast {
            current_weather: Some(CurrentConditions {
                temperature: 28.6,
                windspeed: 14.0,
                winddirection: None,
                weathercode: 2,
                is_day: Some(1),
                time: start() + Duration::hours(14),
            }),
            hourly: Some(HourlySeries {
                time: (0..hours).map(|h| start() + Duration::hours(h as i64)).collect(),
                temperature_2m: (0..hours).map(|h| Some(25.0 + (h % 24) as f64 / 4.0)).collect(),
                precipitation_probability: (0..hours).map(|h| Some((h % 100) as f64)).collect(),
                relative_humidity_2m: (0..hours).map(|_| Some(80.0)).collect(),
                weathercode: (0..hours).map(|h| Some(if h % 2 == 0 { 61 } else { 1000 })).collect(),
            }),
            daily: Some(DailySeries {
                time: (0..days).map(|d| first_day + Duration::days(d as i64)).collect(),
                temperature_2m_max: (0..days).map(|d| Some(31.4 + d as f64)).collect(),
                temperature_2m_min: (0..days).map(|d| Some(24.5 - d as f64)).collect(),
                sunrise: (0..days)
                    .map(|d| Some(start() + Duration::days(d as i64) + Duration::minutes(351)))
                    .collect(),
                sunset: (0..days)
                    .map(|d| Some(start() + Duration::days(d as i64) + Duration::minutes(1104)))
                    .collect(),
                precipitation_probability_max: (0..days).map(|_| Some(70.0)).collect(),
                weathercode: (0..days).map(|_| Some(95)).collect(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_hourly_points_match_source_length() {
        for hours in [0, 1, 23, 168] {
            let raw = forecast(7, hours);
            assert_eq!(hourly_chart_points(&raw).count(), raw.hour_count());
        }
    }

    #[test]
    fn test_hourly_labels_use_unpadded_hour() {
        let raw = forecast(1, 24);
        let labels: Vec<String> = hourly_chart_points(&raw).map(|p| p.label).collect();
        assert_eq!(labels[0], "0:00");
        assert_eq!(labels[9], "9:00");
        assert_eq!(labels[23], "23:00");
    }

    #[test]
    fn test_hourly_points_are_restartable() {
        let raw = forecast(2, 48);
        let first: Vec<_> = hourly_chart_points(&raw).collect();
        let second: Vec<_> = hourly_chart_points(&raw).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_daily_points_match_source_length() {
        let raw = forecast(7, 168);
        let points: Vec<_> = daily_chart_points(&raw).collect();
        assert_eq!(points.len(), raw.day_count());
        assert_eq!(points[0].label, "Mon");
        assert_eq!(points[6].label, "Sun");
        assert_eq!(points[0].max, Some(31.4));
        assert_eq!(points[0].precipitation_max, Some(70.0));
    }

    #[test]
    fn test_missing_sections_give_empty_views() {
        let raw = RawForecast::default();
        assert_eq!(hourly_chart_points(&raw).count(), 0);
        assert_eq!(daily_chart_points(&raw).count(), 0);
        assert!(slice_hourly_for_day(&raw, 0).is_empty());
        assert_eq!(selected_day_index(&raw, start().date()), FALLBACK_DAY_INDEX);
        assert_eq!(temperature_domain(&raw), None);

        let view = derive_view(&raw, 0);
        assert!(view.current.is_none());
        assert!(view.day_cards.is_empty());
    }

    #[test]
    fn test_selected_day_index_finds_today() {
        let raw = forecast(7, 168);
        let today = start().date() + Duration::days(3);
        assert_eq!(selected_day_index(&raw, today), 3);
    }

    #[test]
    fn test_selected_day_index_falls_back_to_zero() {
        let raw = forecast(7, 168);
        let today = start().date() - Duration::days(1);
        assert_eq!(selected_day_index(&raw, today), 0);
    }

    #[test]
    fn test_slice_last_day_of_week() {
        let raw = forecast(7, 168);
        let slice = slice_hourly_for_day(&raw, 6);
        assert_eq!(slice.len(), 24);
        let last_day = start().date() + Duration::days(6);
        assert!(slice.iter().all(|e| e.time.date() == last_day));
        assert_eq!(slice[0].time.hour(), 0);
        assert_eq!(slice[23].time.hour(), 23);
    }

    #[test]
    fn test_slice_entries_fall_within_their_day() {
        let raw = forecast(7, 168);
        let dates = &raw.daily.as_ref().unwrap().time;
        for (i, date) in dates.iter().enumerate() {
            let slice = slice_hourly_for_day(&raw, i);
            assert_eq!(slice.len(), 24);
            assert!(slice.iter().all(|e| e.time.date() == *date), "day {}", i);
        }
    }

    #[test]
    fn test_slice_short_series_returns_what_exists() {
        let raw = forecast(7, 150);
        assert_eq!(slice_hourly_for_day(&raw, 5).len(), 24);
        assert_eq!(slice_hourly_for_day(&raw, 6).len(), 6);
        assert!(slice_hourly_for_day(&raw, 7).is_empty());
        assert!(slice_hourly_for_day(&raw, usize::MAX).is_empty());
    }

    #[test]
    fn test_temperature_domain_is_padded() {
        let raw = forecast(1, 24);
        let (lo, hi) = temperature_domain(&raw).unwrap();
        assert_eq!(lo, 23.0);
        assert_eq!(hi, 25.0 + 23.0 / 4.0 + 2.0);
    }

    #[test]
    fn test_derive_view_cards() {
        let raw = forecast(7, 168);
        let view = derive_view(&raw, 1);

        let current = view.current.as_ref().unwrap();
        assert_eq!(current.temperature, 29);
        assert_eq!(current.time_label, "14:00");
        assert_eq!(current.description, "Partly cloudy");

        let monday = &view.day_cards[0];
        assert_eq!(monday.max, Some(31));
        assert_eq!(monday.min, Some(25));
        assert_eq!(monday.sunrise.as_deref(), Some("05:51"));
        assert_eq!(monday.sunset.as_deref(), Some("18:24"));
        assert_eq!(monday.description, "Thunderstorm");

        assert_eq!(view.selected_day, 1);
        assert_eq!(view.selected_day_hourly_points.len(), 24);
        assert_eq!(view.selected_day_hourly_points[0].description, "Slight rain");
        assert_eq!(view.selected_day_hourly_points[1].description, "Unknown");
        assert_eq!(view.selected_day_hourly_points[1].icon, "🌡️");
    }

    #[test]
    fn test_derive_view_is_idempotent() {
        let raw = forecast(7, 168);
        let before = raw.clone();
        assert_eq!(derive_view(&raw, 4), derive_view(&raw, 4));
        assert_eq!(raw, before);
    }
}
