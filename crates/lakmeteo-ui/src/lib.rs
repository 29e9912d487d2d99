//! Presentation-facing side of LakMeteo: the forecast fetcher and the
//! dashboard model a renderer reads from.

pub mod error_mapping;
pub mod models;
pub mod services;

pub use models::weather_model::{ActiveTab, WeatherModel};
pub use services::weather_service::{
    FetchFailure, FetchStatus, ForecastFetcher, WeatherServiceMessage, REFRESH_INTERVAL,
};
