//! TMDB API response types and search parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::query::QueryParameters;

/// Deserializes `null` as the type's default value.
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Search Movie ---

/// Response from `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchMovieResponse {
    /// Current page number.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub page: u32,
    /// Search results, in the order TMDB returned them.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub total_results: u32,
}

/// A single movie search result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub id: u64,
    /// Original title.
    #[serde(
        rename = "original_title",
        default,
        deserialize_with = "deserialize_null_as_default"
    )]
    pub title: String,
    /// Overview text.
    pub overview: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Release date (YYYY-MM-DD, empty or null when unknown).
    pub release_date: Option<String>,
}

impl Movie {
    /// Parses `release_date`, returning `None` when it is missing or not a
    /// `YYYY-MM-DD` date.
    #[must_use]
    pub fn released_on(&self) -> Option<NaiveDate> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Search Parameters ---

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieRequest {
    /// Search query (required).
    pub query: String,
    /// Result page (default: 1).
    pub page: u32,
    /// Include adult content (default: `true`).
    pub include_adult: bool,
    /// Filter by release year.
    pub year: Option<u32>,
}

impl SearchMovieRequest {
    /// Creates a request for the first page of results for `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            include_adult: true,
            year: None,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets whether adult titles are included.
    #[must_use]
    pub const fn include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }

    /// Sets the year filter. `0` clears it.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = if year == 0 { None } else { Some(year) };
        self
    }
}

impl QueryParameters for SearchMovieRequest {
    fn query_parameters(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("include_adult", self.include_adult.to_string()),
        ];
        if let Some(year) = self.year {
            query.push(("year", year.to_string()));
        }
        query
    }
}
