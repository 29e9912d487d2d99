//! Forecast fetch error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Request could not be sent, or timed out
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Body is not the expected JSON shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Kind of a [`FetchError`], kept on failed statuses for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Http,
    Parse,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Network(_) => FetchErrorKind::Network,
            Self::Http { .. } => FetchErrorKind::Http,
            Self::Parse(_) => FetchErrorKind::Parse,
        }
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }
}
