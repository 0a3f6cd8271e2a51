//! TMDB API client module.
//!
//! Handles rate-limited HTTP requests to the TMDB API v3 endpoints
//! and decodes movie search results.

mod api;
mod client;
mod config;
mod query;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use config::{
    ClientConfig, DEFAULT_REQUESTS_PER_SECOND, ENV_API_KEY, ENV_BASE_URL, ENV_REQUESTS_PER_SECOND,
};
pub use query::QueryParameters;
pub use types::{Movie, SearchMovieRequest, SearchMovieResponse};
