//! Maps service errors to lakmeteo_core::AppError for consistent user-facing messages.

mod weather;

pub use weather::fetch_error_to_app_error;
