pub mod weather_service;

pub use weather_service::{FetchFailure, FetchStatus, ForecastFetcher, WeatherServiceMessage};
