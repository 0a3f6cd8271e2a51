//! `TmdbClient` - TMDB API client implementation.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::config::ClientConfig;
use super::query::{QueryParameters, encode_sorted};
use super::types::{Movie, SearchMovieRequest, SearchMovieResponse, TmdbErrorResponse};
use crate::error::TmdbError;
use crate::rate_limiter::RateLimiter;

/// Default host for TMDB API v3.
const DEFAULT_HOST: &str = "https://api.themoviedb.org/3";

/// An API endpoint: the host it lives on by default and its path.
#[derive(Debug, Clone, Copy)]
struct Endpoint {
    /// Default host, used unless the client overrides it.
    host: &'static str,
    /// Path appended to the host.
    path: &'static str,
}

/// `search/movie` endpoint.
const SEARCH_MOVIE: Endpoint = Endpoint {
    host: DEFAULT_HOST,
    path: "/search/movie",
};

/// TMDB API client.
///
/// All requests share one [`RateLimiter`]. The client is `Send + Sync`;
/// wrap it in an `Arc` to use it from several tasks.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Host override.
    base_url: Option<String>,
    /// API key.
    api_key: String,
    /// Rate limiter.
    rate_limiter: RateLimiter,
}

/// Builder for `TmdbClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    config: ClientConfig,
}

impl TmdbClientBuilder {
    /// Replaces the whole configuration, e.g. with [`ClientConfig::from_env`].
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Uses a custom HTTP transport.
    #[must_use]
    pub fn http_client(mut self, http_client: Client) -> Self {
        self.config.http_client = Some(http_client);
        self
    }

    /// Overrides the API host (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Sets the request rate and burst size (default: 4).
    #[must_use]
    pub const fn requests_per_second(mut self, requests_per_second: u32) -> Self {
        self.config.requests_per_second = requests_per_second;
        self
    }

    /// Sets the User-Agent of the default transport.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Applies an arbitrary transformation to the configuration.
    ///
    /// Options run in the order they are added, before validation.
    #[must_use]
    pub fn option(mut self, option: impl FnOnce(ClientConfig) -> ClientConfig) -> Self {
        self.config = option(self.config);
        self
    }

    /// Builds the client and starts its rate limiter.
    ///
    /// # Errors
    ///
    /// - `api_key` is empty.
    /// - `requests_per_second` is zero.
    /// - `reqwest::Client` build fails.
    /// - Called outside a Tokio runtime.
    pub fn build(self) -> Result<TmdbClient, TmdbError> {
        self.config.validate()?;
        let ClientConfig {
            api_key,
            base_url,
            requests_per_second,
            http_client,
            user_agent,
        } = self.config;

        let http_client = if let Some(client) = http_client {
            client
        } else {
            let mut builder = Client::builder();
            if let Some(ref ua) = user_agent {
                builder = builder.user_agent(ua);
            }
            builder.build().map_err(|e| {
                TmdbError::configuration(format!("failed to build HTTP client: {e}"))
            })?
        };

        let base_url = base_url.map(|url| String::from(url.trim_end_matches('/')));
        let rate_limiter = RateLimiter::new(requests_per_second)?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
            rate_limiter,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::default()
    }

    /// The client's rate limiter.
    #[must_use]
    pub const fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Stops the rate limiter's refill task. Later requests fail with
    /// [`TmdbError::Closed`]. Dropping the client has the same effect.
    pub fn close(&self) {
        self.rate_limiter.close();
    }

    /// Builds the query string for `request` with `api_key` added.
    fn signed_query(&self, request: &impl QueryParameters) -> Result<String, TmdbError> {
        if self.api_key.is_empty() {
            return Err(TmdbError::configuration("api_key is required"));
        }
        let mut params = request.query_parameters();
        params.retain(|&(key, _)| key != "api_key");
        params.push(("api_key", self.api_key.clone()));
        Ok(encode_sorted(params))
    }

    /// Waits for a rate-limit permit, then sends a GET to `endpoint` with
    /// `request` as query parameters.
    #[instrument(skip_all)]
    async fn get(
        &self,
        endpoint: Endpoint,
        request: &impl QueryParameters,
    ) -> Result<Response, TmdbError> {
        self.rate_limiter.acquire().await?;

        let host = self.base_url.as_deref().unwrap_or(endpoint.host);
        let mut url = Url::parse(&format!("{host}{}", endpoint.path)).map_err(|e| {
            TmdbError::configuration(format!("invalid URL for {}: {e}", endpoint.path))
        })?;
        url.set_query(Some(&self.signed_query(request)?));

        tracing::debug!(host, path = endpoint.path, "TMDB API request");

        Ok(self.http_client.get(url).send().await?)
    }

    /// Sends a GET and decodes a 2xx JSON body into `T`.
    #[instrument(skip_all)]
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: &impl QueryParameters,
    ) -> Result<T, TmdbError> {
        let response = self.get(endpoint, request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error_response = serde_json::from_str::<TmdbErrorResponse>(&body).ok();
            return Err(TmdbError::HttpStatus {
                status: status.as_u16(),
                status_line: status.to_string(),
                tmdb_code: error_response.as_ref().map(|e| e.status_code),
                message: error_response.map(|e| e.status_message),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(TmdbError::Decode)
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn search_movies(&self, request: &SearchMovieRequest) -> Result<Vec<Movie>, TmdbError> {
        let response = self.search_movie_page(request).await?;
        Ok(response.results)
    }

    #[instrument(skip_all, fields(page = request.page))]
    async fn search_movie_page(
        &self,
        request: &SearchMovieRequest,
    ) -> Result<SearchMovieResponse, TmdbError> {
        if request.query.is_empty() {
            return Err(TmdbError::Validation(String::from("query is required")));
        }

        let response: SearchMovieResponse = self.get_json(SEARCH_MOVIE, request).await?;
        if response.total_results == 0 {
            return Err(TmdbError::NotFound);
        }
        Ok(response)
    }
}
