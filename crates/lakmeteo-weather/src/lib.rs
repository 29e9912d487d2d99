//! Forecast data for LakMeteo
//!
//! Fetches the raw Open-Meteo forecast for one location and reshapes it
//! into chart and card friendly views.

pub mod codes;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod types;

mod local_time;

pub use codes::{description_for, icon_for, WeatherInfo};
pub use error::{FetchError, FetchErrorKind};
pub use normalize::{
    daily_chart_points, derive_view, hourly_chart_points, selected_day_index,
    slice_hourly_for_day, temperature_domain, CurrentCard, DailyChartPoint, DayCard, DerivedView,
    HourCard, HourlyChartPoint, FALLBACK_DAY_INDEX, HOURS_PER_DAY,
};
pub use provider::ForecastProvider;
pub use types::*;
