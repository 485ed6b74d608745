//! Movie metadata provider integration (TMDB).
//!
//! Resolves free-text queries into canonical title/year/identifier records
//! plus poster and synopsis. Failures here never reach the decision logic:
//! callers degrade to "no movies found".

mod tmdb;
mod types;

pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::{MovieDetails, MovieSummary};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the metadata provider.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for metadata providers.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search for movies by free-text query. One page of results.
    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MovieSummary>, MetadataError>;

    /// Full details for a specific movie.
    async fn movie_details(&self, tmdb_id: u32) -> Result<MovieDetails, MetadataError>;
}
