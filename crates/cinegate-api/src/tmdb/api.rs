//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::types::{Movie, SearchMovieRequest, SearchMovieResponse};
use crate::error::TmdbError;

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Searches for movies and returns the results of the requested page.
    ///
    /// # Errors
    ///
    /// - `Validation` if the query is empty (no request is sent).
    /// - `HttpStatus` on a non-2xx response.
    /// - `Decode` if the body is not a search response.
    /// - `NotFound` if TMDB reports zero results.
    async fn search_movies(&self, request: &SearchMovieRequest) -> Result<Vec<Movie>, TmdbError>;

    /// Searches for movies and returns the whole page, including
    /// `total_pages` for walking further pages.
    ///
    /// # Errors
    ///
    /// Same as [`search_movies`](Self::search_movies).
    async fn search_movie_page(
        &self,
        request: &SearchMovieRequest,
    ) -> Result<SearchMovieResponse, TmdbError>;
}
