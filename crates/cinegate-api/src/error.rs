//! Error types for the TMDB client.

use crate::rate_limiter::LimiterClosed;

/// Errors returned by [`crate::tmdb::TmdbClient`] and its rate limiter.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// The client configuration is unusable (missing API key, zero rate, ...).
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A caller-supplied request failed a precondition.
    #[error("validation error: {0}")]
    Validation(String),
    /// The server answered with a non-2xx status.
    #[error(
        "TMDB API error (HTTP {status_line}){}",
        detail_suffix(.tmdb_code.as_ref().copied(), .message.as_deref())
    )]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// Status line, e.g. `404 Not Found`.
        status_line: String,
        /// `status_code` from a TMDB error body, when present.
        tmdb_code: Option<u32>,
        /// `status_message` from a TMDB error body, when present.
        message: Option<String>,
    },
    /// The request succeeded but reported zero results.
    #[error("no results found")]
    NotFound,
    /// The response body was not the expected JSON shape.
    #[error("failed to decode JSON response: {0}")]
    Decode(#[source] serde_json::Error),
    /// Connection, DNS or body read failure from the HTTP layer.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The client was used after being closed.
    #[error(transparent)]
    Closed(#[from] LimiterClosed),
}

/// Category of a [`TmdbError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`TmdbError::Configuration`].
    Configuration,
    /// See [`TmdbError::Validation`].
    Validation,
    /// See [`TmdbError::HttpStatus`].
    HttpStatus,
    /// See [`TmdbError::NotFound`].
    NotFound,
    /// See [`TmdbError::Decode`].
    Decode,
    /// See [`TmdbError::Transport`].
    Transport,
    /// See [`TmdbError::Closed`].
    Closed,
}

impl TmdbError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Validation(_) => ErrorKind::Validation,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::NotFound => ErrorKind::NotFound,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Closed(_) => ErrorKind::Closed,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Formats the TMDB error body fields as a `": ..."` suffix.
fn detail_suffix(code: Option<u32>, message: Option<&str>) -> String {
    match (code, message) {
        (Some(code), Some(message)) => format!(": code={code}, message={message}"),
        (Some(code), None) => format!(": code={code}"),
        (None, Some(message)) => format!(": {message}"),
        (None, None) => String::new(),
    }
}
