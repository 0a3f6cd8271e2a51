//! Rate-limited client library for the TMDB API.
//!
//! Every request made through a [`tmdb::TmdbClient`] first takes a permit
//! from its [`rate_limiter::RateLimiter`], a bursty token bucket sized to the
//! configured requests-per-second.

/// Error types.
pub mod error;

/// Token-bucket rate limiter.
pub mod rate_limiter;

/// TMDB API client.
pub mod tmdb;

pub use error::{ErrorKind, TmdbError};
