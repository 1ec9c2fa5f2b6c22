//! Movie catalog client for the TMDB metadata service.
//!
//! Every operation is a plain request/response mapping onto the remote API.
//! The client keeps no state between calls: no caching and no retries.

mod image;
mod tmdb;
mod types;

pub use image::{image_url, ImageSize, ImageUrls};
pub use tmdb::TmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Http(_) => "http",
            CatalogError::RateLimitExceeded => "rate_limited",
            CatalogError::NotFound(_) => "not_found",
            CatalogError::Api { .. } => "api",
            CatalogError::Parse(_) => "parse",
            CatalogError::NotConfigured(_) => "not_configured",
        }
    }
}

/// Read-only movie catalog.
///
/// Implemented by [`TmdbClient`] and by the test mock.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// List a curated category.
    async fn list_by_category(
        &self,
        category: MovieCategory,
        page: u32,
    ) -> Result<MoviesPage, CatalogError>;

    /// Filtered discovery. An unset sort key means popularity descending.
    async fn discover(&self, query: &DiscoverQuery) -> Result<MoviesPage, CatalogError>;

    /// Free-text title search. The query is forwarded as-is, even when empty.
    async fn search(&self, query: &str, page: u32) -> Result<MoviesPage, CatalogError>;

    /// All movie genres.
    async fn genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// Movie details with videos and credits in the same round trip.
    async fn movie_details(&self, movie_id: u32) -> Result<MovieDetails, CatalogError>;

    /// Movies similar to the given one (first page).
    async fn similar(&self, movie_id: u32) -> Result<MoviesPage, CatalogError>;
}
