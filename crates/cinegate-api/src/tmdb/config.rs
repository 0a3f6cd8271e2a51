//! `ClientConfig` - settings a `TmdbClient` is built from.

use crate::error::TmdbError;
use crate::rate_limiter::MAX_REQUESTS_PER_SECOND;

/// Default request rate (requests per second).
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 4;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "TMDB_API_KEY";
/// Environment variable overriding the API host.
pub const ENV_BASE_URL: &str = "TMDB_BASE_URL";
/// Environment variable overriding the request rate.
pub const ENV_REQUESTS_PER_SECOND: &str = "TMDB_REQUESTS_PER_SECOND";

/// Client configuration.
///
/// Builder options and [`crate::tmdb::TmdbClientBuilder::option`]
/// transformations are applied to this struct before it is validated.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ClientConfig {
    /// TMDB v3 API key, sent as `api_key` on every request (required).
    pub api_key: String,
    /// Host override (e.g. a mock server); wins over each endpoint's host.
    pub base_url: Option<String>,
    /// Requests per second, also the burst size.
    pub requests_per_second: u32,
    /// HTTP transport. A plain `reqwest::Client` is created when unset.
    pub http_client: Option<reqwest::Client>,
    /// User-Agent for the default transport. Ignored with a custom transport.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            http_client: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Reads `TMDB_API_KEY`, `TMDB_BASE_URL` and `TMDB_REQUESTS_PER_SECOND`
    /// from the environment on top of the defaults.
    ///
    /// A missing API key is not an error here; `build()` rejects it.
    ///
    /// # Errors
    ///
    /// Returns an error if `TMDB_REQUESTS_PER_SECOND` is not a positive integer.
    pub fn from_env() -> Result<Self, TmdbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, TmdbError> {
        let mut config = Self::default();
        if let Some(api_key) = lookup(ENV_API_KEY) {
            config.api_key = api_key;
        }
        config.base_url = lookup(ENV_BASE_URL).filter(|url| !url.is_empty());
        if let Some(raw) = lookup(ENV_REQUESTS_PER_SECOND) {
            config.requests_per_second = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|&rate| rate > 0)
                .ok_or_else(|| {
                    TmdbError::configuration(format!(
                        "{ENV_REQUESTS_PER_SECOND} must be a positive integer, got {raw:?}"
                    ))
                })?;
        }
        Ok(config)
    }

    /// Checks the invariants `build()` relies on.
    pub(crate) fn validate(&self) -> Result<(), TmdbError> {
        if self.api_key.is_empty() {
            return Err(TmdbError::configuration("api_key is required"));
        }
        if self.requests_per_second == 0 {
            return Err(TmdbError::configuration(
                "requests_per_second must be greater than zero",
            ));
        }
        if self.requests_per_second > MAX_REQUESTS_PER_SECOND {
            return Err(TmdbError::configuration(format!(
                "requests_per_second must be at most {MAX_REQUESTS_PER_SECOND}"
            )));
        }
        Ok(())
    }
}
