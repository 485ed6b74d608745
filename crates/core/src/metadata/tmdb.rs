//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{MovieDetails, MovieSummary};
use super::{MetadataError, MetadataProvider};

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL for posters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    image_base_url: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        let image_base_url = config
            .image_base_url
            .unwrap_or_else(|| "https://image.tmdb.org/t/p".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            image_base_url,
        })
    }

    /// Full URL for a poster path, suitable for sending to users.
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}/w500{}", self.image_base_url, poster_path)
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MovieSummary>, MetadataError> {
        let url = format!("{}/search/movie", self.base_url);

        debug!("TMDB movie search: query='{}', page={}", query, page);

        let page = page.max(1).to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("page", page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(MetadataError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let search_result: TmdbSearchResponse = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse movie search response: {}", e))
        })?;

        Ok(search_result
            .results
            .into_iter()
            .map(|r| r.into())
            .collect())
    }

    async fn movie_details(&self, tmdb_id: u32) -> Result<MovieDetails, MetadataError> {
        let url = format!("{}/movie/{}", self.base_url, tmdb_id);

        debug!("TMDB get movie: id={}", tmdb_id);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if status == 404 {
            return Err(MetadataError::NotFound(format!("Movie ID {}", tmdb_id)));
        }
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let details: TmdbMovieDetails = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse movie response: {}", e))
        })?;

        Ok(details.into())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    results: Vec<TmdbMovieResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u32,
    title: String,
    original_title: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    id: u32,
    title: String,
    original_title: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    overview: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<TmdbMovieResult> for MovieSummary {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            original_title: r.original_title,
            // TMDB reports missing dates as empty strings.
            release_date: r.release_date.filter(|d| !d.is_empty()),
            overview: r.overview,
            poster_path: r.poster_path,
        }
    }
}

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(d: TmdbMovieDetails) -> Self {
        Self {
            id: d.id,
            title: d.title,
            original_title: d.original_title,
            release_date: d.release_date.filter(|dt| !dt.is_empty()),
            runtime_minutes: d.runtime,
            overview: d.overview,
            poster_path: d.poster_path,
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            vote_average: d.vote_average,
            vote_count: d.vote_count,
            imdb_id: d.imdb_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let result = TmdbClient::new(TmdbConfig {
            api_key: String::new(),
            base_url: None,
            image_base_url: None,
        });
        assert!(matches!(result, Err(MetadataError::NotConfigured(_))));
    }

    #[test]
    fn test_poster_url() {
        let client = TmdbClient::new(TmdbConfig {
            api_key: "key".to_string(),
            base_url: None,
            image_base_url: None,
        })
        .unwrap();

        assert_eq!(
            client.poster_url("/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_movie_result_conversion() {
        let result = TmdbMovieResult {
            id: 603,
            title: "The Matrix".to_string(),
            original_title: Some("The Matrix".to_string()),
            release_date: Some("1999-03-30".to_string()),
            overview: Some("A computer hacker...".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
        };

        let movie: MovieSummary = result.into();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.year(), Some(1999));
    }

    #[test]
    fn test_empty_release_date_becomes_none() {
        let result = TmdbMovieResult {
            id: 1,
            title: "Unreleased".to_string(),
            original_title: None,
            release_date: Some(String::new()),
            overview: None,
            poster_path: None,
        };

        let movie: MovieSummary = result.into();
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.year(), None);
    }

    #[test]
    fn test_movie_details_conversion() {
        let details = TmdbMovieDetails {
            id: 603,
            title: "The Matrix".to_string(),
            original_title: Some("The Matrix".to_string()),
            release_date: Some("1999-03-30".to_string()),
            runtime: Some(136),
            overview: Some("A computer hacker...".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            genres: vec![
                TmdbGenre {
                    name: "Action".to_string(),
                },
                TmdbGenre {
                    name: "Science Fiction".to_string(),
                },
            ],
            vote_average: Some(8.2),
            vote_count: Some(21000),
            imdb_id: Some("tt0133093".to_string()),
        };

        let movie: MovieDetails = details.into();
        assert_eq!(movie.runtime_minutes, Some(136));
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(movie.vote_count, Some(21000));
        assert_eq!(movie.year(), Some(1999));
    }
}
