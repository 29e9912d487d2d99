use lakmeteo_core::{AppError, NetworkError, ReqwestErrorExt, WeatherError};
use lakmeteo_weather::FetchError;

/// Collapse a fetch error into the application error hierarchy.
pub fn fetch_error_to_app_error(e: FetchError) -> AppError {
    match e {
        FetchError::Network(e) => AppError::Network(e.into_network_error()),
        FetchError::Http { status, body } => AppError::Network(NetworkError::ServerError {
            status,
            message: body,
        }),
        FetchError::Parse(e) => AppError::Weather(WeatherError::InvalidForecast(e.to_string())),
    }
}
