use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use lakmeteo_core::Config;
use lakmeteo_weather::{
    derive_view, selected_day_index, DerivedView, FetchError, ForecastProvider, Location,
    RawForecast,
};
use tokio::runtime::Handle;

use crate::services::{FetchStatus, ForecastFetcher};

/// Which forecast panel is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Hourly,
    Daily,
}

/// Dashboard state owned by the presentation thread.
///
/// Holds the last successful forecast and the user's selections. Views are
/// re-derived from the stored forecast on every call to [`Self::view`].
pub struct WeatherModel {
    fetcher: ForecastFetcher,
    location_name: String,
    weather_data: Option<Arc<RawForecast>>,
    /// `None` until the user picks a day; then today's index is used
    selected_day: Option<usize>,
    active_tab: ActiveTab,
    error_message: String,
    is_stale: bool,
}

impl WeatherModel {
    pub fn new(fetcher: ForecastFetcher, location_name: impl Into<String>) -> Self {
        Self {
            fetcher,
            location_name: location_name.into(),
            weather_data: None,
            selected_day: None,
            active_tab: ActiveTab::default(),
            error_message: String::new(),
            is_stale: false,
        }
    }

    /// Wire a provider and fetcher from configuration.
    pub fn from_config(config: &Config, runtime: Handle) -> Result<Self, FetchError> {
        let location = Location {
            latitude: config.location.latitude,
            longitude: config.location.longitude,
            timezone: config.location.timezone.clone(),
        };
        let provider = ForecastProvider::with_api_url(
            &config.weather.api_url,
            location,
            Duration::from_secs(config.weather.request_timeout_secs),
        )?;
        let fetcher = ForecastFetcher::new(
            Arc::new(provider),
            runtime,
            Duration::from_secs(config.weather.refresh_seconds),
        );

        Ok(Self::new(fetcher, config.location.name.clone()))
    }

    pub fn status(&self) -> &FetchStatus {
        self.fetcher.status()
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn has_data(&self) -> bool {
        self.weather_data.is_some()
    }

    /// True when the shown data outlived a failed refresh.
    pub fn is_stale(&self) -> bool {
        self.is_stale
    }

    /// Empty unless the most recent applied fetch failed.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn weather_data(&self) -> Option<&RawForecast> {
        self.weather_data.as_deref()
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    /// Select a forecast day. Ignored when out of range for the current data.
    pub fn select_day(&mut self, index: usize) -> bool {
        let days = self.weather_data.as_ref().map_or(0, |d| d.day_count());
        if index >= days {
            tracing::debug!(index, days, "Ignoring out-of-range day selection");
            return false;
        }
        self.selected_day = Some(index);
        true
    }

    /// Day index the view is built for: the user's pick if still in range,
    /// otherwise today's.
    pub fn selected_day(&self, today: NaiveDate) -> usize {
        let Some(data) = self.weather_data.as_deref() else {
            return 0;
        };
        match self.selected_day {
            Some(i) if i < data.day_count() => i,
            _ => selected_day_index(data, today),
        }
    }

    /// Render-ready view for the stored forecast, or `None` before the
    /// first successful fetch.
    pub fn view(&self, today: NaiveDate) -> Option<DerivedView> {
        let data = self.weather_data.as_deref()?;
        Some(derive_view(data, self.selected_day(today)))
    }

    pub fn start(&mut self) {
        self.fetcher.start();
    }

    pub fn stop(&mut self) {
        self.fetcher.stop();
    }

    pub fn refresh(&mut self) {
        self.fetcher.refresh();
    }

    pub fn is_running(&self) -> bool {
        self.fetcher.is_running()
    }

    /// Apply pending fetch results. Call from the presentation loop.
    ///
    /// Reads the fetcher's retained outcomes rather than its status, which a
    /// tick drained in the same pass may already have moved to `Loading`.
    pub fn poll_channel(&mut self) -> bool {
        if !self.fetcher.poll() {
            return false;
        }

        if let Some(data) = self.fetcher.latest_forecast() {
            self.weather_data = Some(Arc::clone(data));
        }
        match self.fetcher.last_failure() {
            Some(failure) => {
                self.error_message = failure.message.clone();
                self.is_stale = self.weather_data.is_some();
            }
            None => {
                self.error_message.clear();
                self.is_stale = false;
            }
        }
        true
    }
}
