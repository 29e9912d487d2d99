//! Forecast fetcher: scheduled and manual forecast fetches.
//!
//! Network work runs on the tokio runtime; completions and timer ticks come
//! back over an mpsc channel and are applied on the caller's thread by
//! `poll()`. Fetches are therefore only ever initiated from that thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use lakmeteo_weather::{FetchError, FetchErrorKind, ForecastProvider, RawForecast};
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error_mapping::fetch_error_to_app_error;

/// Default auto-refresh period
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Outcome of the most recently applied fetch attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success(Arc<RawForecast>),
    Failed(FetchFailure),
}

impl FetchStatus {
    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchStatus::Failed(f) => Some(f),
            _ => None,
        }
    }
}

/// A failed attempt as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Banner text
    pub message: String,
    /// Underlying error, for logs
    pub detail: String,
    pub kind: FetchErrorKind,
}

impl From<FetchError> for FetchFailure {
    fn from(e: FetchError) -> Self {
        let kind = e.kind();
        let detail = e.to_string();
        let message = fetch_error_to_app_error(e).user_message().to_string();
        Self {
            message,
            detail,
            kind,
        }
    }
}

/// Messages sent from the runtime back to the owning thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// The refresh timer fired
    Tick { epoch: u64 },
    /// A fetch completed
    FetchDone {
        seq: u64,
        epoch: u64,
        result: Result<RawForecast, FetchError>,
    },
}

/// Periodic forecast retrieval for one location.
///
/// Each attempt gets a sequence number. A completion is applied only if its
/// number is higher than every one applied before it, so a slow early
/// request can never overwrite a faster later one. `stop()` advances the
/// epoch; anything tagged with an older epoch is dropped on arrival.
pub struct ForecastFetcher {
    provider: Arc<ForecastProvider>,
    runtime: Handle,
    interval: Duration,
    tx: Sender<WeatherServiceMessage>,
    rx: Receiver<WeatherServiceMessage>,
    status: FetchStatus,
    /// Last successfully applied forecast, kept across later failures
    latest: Option<Arc<RawForecast>>,
    /// Set when the most recently applied attempt failed
    last_failure: Option<FetchFailure>,
    timer: Option<CancellationToken>,
    epoch: u64,
    /// Last sequence number handed out
    issued_seq: u64,
    /// Highest sequence number issued in the current epoch
    pending_seq: u64,
    /// Highest sequence number applied
    applied_seq: u64,
}

impl ForecastFetcher {
    pub fn new(provider: Arc<ForecastProvider>, runtime: Handle, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            provider,
            runtime,
            interval,
            tx,
            rx,
            status: FetchStatus::Idle,
            latest: None,
            last_failure: None,
            timer: None,
            epoch: 0,
            issued_seq: 0,
            pending_seq: 0,
            applied_seq: 0,
        }
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Newest forecast that was applied successfully.
    pub fn latest_forecast(&self) -> Option<&Arc<RawForecast>> {
        self.latest.as_ref()
    }

    /// Failure of the most recently applied attempt, cleared by the next success.
    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// True while a request newer than the last applied one is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending_seq > self.applied_seq
    }

    /// Fetch now, then every `interval`. No-op when already started.
    pub fn start(&mut self) {
        if self.timer.is_some() {
            tracing::debug!("Forecast fetcher already started");
            return;
        }

        let token = CancellationToken::new();
        self.timer = Some(token.clone());
        tracing::info!("Starting forecast fetcher (every {:?})", self.interval);

        self.issue_fetch();

        if self.interval.is_zero() {
            tracing::warn!("Refresh interval is zero, automatic refresh disabled");
            return;
        }

        let tx = self.tx.clone();
        let epoch = self.epoch;
        let period = self.interval;
        self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(WeatherServiceMessage::Tick { epoch }).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Forecast refresh timer stopped");
        });
    }

    /// Cancel the schedule. In-flight requests finish but their results
    /// are discarded.
    pub fn stop(&mut self) {
        let Some(token) = self.timer.take() else {
            return;
        };
        token.cancel();
        self.epoch += 1;
        self.pending_seq = 0;
        if self.status == FetchStatus::Loading {
            self.status = FetchStatus::Idle;
        }
        tracing::info!("Forecast fetcher stopped");
    }

    /// Manual refresh outside the timer. Returns the attempt's sequence number.
    pub fn refresh(&mut self) -> u64 {
        self.issue_fetch()
    }

    /// Drain the channel. Returns true if the status changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                WeatherServiceMessage::Tick { epoch } => {
                    if epoch == self.epoch && self.timer.is_some() {
                        self.issue_fetch();
                        changed = true;
                    }
                }
                WeatherServiceMessage::FetchDone { seq, epoch, result } => {
                    changed |= self.apply(seq, epoch, result);
                }
            }
        }
        changed
    }

    #[cfg(test)]
    pub(crate) fn sender(&self) -> Sender<WeatherServiceMessage> {
        self.tx.clone()
    }

    #[cfg(test)]
    pub(crate) fn current_epoch(&self) -> u64 {
        self.epoch
    }

    fn next_seq(&mut self) -> u64 {
        self.issued_seq += 1;
        self.pending_seq = self.issued_seq;
        self.issued_seq
    }

    fn issue_fetch(&mut self) -> u64 {
        let seq = self.next_seq();
        let epoch = self.epoch;
        let provider = self.provider.clone();
        let tx = self.tx.clone();

        self.status = FetchStatus::Loading;

        tracing::debug!(seq, "Issuing forecast fetch");
        self.runtime.spawn(async move {
            let result = provider.fetch().await;
            let _ = tx.send(WeatherServiceMessage::FetchDone { seq, epoch, result });
        });
        seq
    }

    fn apply(&mut self, seq: u64, epoch: u64, result: Result<RawForecast, FetchError>) -> bool {
        if epoch != self.epoch {
            tracing::debug!(seq, "Discarding forecast fetched before stop");
            return false;
        }
        if seq <= self.applied_seq {
            tracing::debug!(seq, applied = self.applied_seq, "Discarding stale forecast");
            return false;
        }
        self.applied_seq = seq;

        self.status = match result {
            Ok(forecast) => {
                tracing::info!(seq, "Forecast updated");
                let forecast = Arc::new(forecast);
                self.latest = Some(Arc::clone(&forecast));
                self.last_failure = None;
                FetchStatus::Success(forecast)
            }
            Err(e) => {
                tracing::error!(seq, kind = ?e.kind(), "Failed to fetch forecast: {}", e);
                let failure = FetchFailure::from(e);
                self.last_failure = Some(failure.clone());
                FetchStatus::Failed(failure)
            }
        };
        true
    }
}

impl Drop for ForecastFetcher {
    fn drop(&mut self) {
        if let Some(token) = self.timer.take() {
            token.cancel();
        }
    }
}
