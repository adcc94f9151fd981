//! Error types for catalog fetches

use std::fmt;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fetch error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Transport, timeout, HTTP status or unreadable response
    QueryFailure,
    /// The query matched no stars
    EmptyResult,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::QueryFailure => "query_failure",
            FetchErrorKind::EmptyResult => "empty_result",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog query failed: {message}")]
    QueryFailure {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("no stars found within {max_distance_pc} pc")]
    EmptyResult { max_distance_pc: f64 },
}

impl FetchError {
    pub fn query_failure(message: impl Into<String>) -> Self {
        FetchError::QueryFailure {
            message: message.into(),
            source: None,
        }
    }

    pub fn query_failure_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        FetchError::QueryFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::QueryFailure { .. } => FetchErrorKind::QueryFailure,
            FetchError::EmptyResult { .. } => FetchErrorKind::EmptyResult,
        }
    }

    pub fn is_empty_result(&self) -> bool {
        self.kind() == FetchErrorKind::EmptyResult
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            format!("transport error: {}", err)
        };
        FetchError::query_failure_with(message, err)
    }
}

impl From<csv::Error> for FetchError {
    fn from(err: csv::Error) -> Self {
        FetchError::query_failure_with(format!("malformed catalog response: {}", err), err)
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
