//! Mock metadata provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{MetadataError, MetadataProvider, MovieDetails, MovieSummary};

/// A recorded metadata query for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedMetadataQuery {
    SearchMovies { query: String, page: u32 },
    MovieDetails { tmdb_id: u32 },
}

/// Mock implementation of the MetadataProvider trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results and details
/// - Track queries for assertions
/// - Simulate failures
pub struct MockMetadataProvider {
    /// Search results returned for any query.
    search_results: Arc<RwLock<Vec<MovieSummary>>>,
    /// Movie details by TMDB id.
    details: Arc<RwLock<HashMap<u32, MovieDetails>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedMetadataQuery>>>,
    /// If set, the next operation fails with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
}

impl Default for MockMetadataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMetadataProvider {
    /// Create a new empty mock provider.
    pub fn new() -> Self {
        Self {
            search_results: Arc::new(RwLock::new(Vec::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the results every search returns.
    pub async fn set_search_results(&self, results: Vec<MovieSummary>) {
        *self.search_results.write().await = results;
    }

    /// Add movie details.
    pub async fn add_details(&self, details: MovieDetails) {
        self.details.write().await.insert(details.id, details);
    }

    /// Fail the next operation with the given error.
    pub async fn fail_next(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    /// All queries made so far.
    pub async fn recorded_queries(&self) -> Vec<RecordedMetadataQuery> {
        self.queries.read().await.clone()
    }

    async fn take_error(&self) -> Option<MetadataError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MovieSummary>, MetadataError> {
        self.queries
            .write()
            .await
            .push(RecordedMetadataQuery::SearchMovies {
                query: query.to_string(),
                page,
            });

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        Ok(self.search_results.read().await.clone())
    }

    async fn movie_details(&self, tmdb_id: u32) -> Result<MovieDetails, MetadataError> {
        self.queries
            .write()
            .await
            .push(RecordedMetadataQuery::MovieDetails { tmdb_id });

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        self.details
            .read()
            .await
            .get(&tmdb_id)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(format!("Movie ID {}", tmdb_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_mock_search_and_details() {
        let provider = MockMetadataProvider::new();
        provider
            .set_search_results(vec![fixtures::movie_summary(603, "The Matrix", 1999)])
            .await;
        provider
            .add_details(fixtures::movie_details(603, "The Matrix", 1999))
            .await;

        let results = provider.search_movies("matrix", 1).await.unwrap();
        assert_eq!(results.len(), 1);

        let details = provider.movie_details(603).await.unwrap();
        assert_eq!(details.title, "The Matrix");

        assert!(provider.movie_details(999).await.is_err());
        assert_eq!(provider.recorded_queries().await.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_injected_failure() {
        let provider = MockMetadataProvider::new();
        provider
            .fail_next(MetadataError::RateLimitExceeded)
            .await;

        assert!(provider.search_movies("anything", 1).await.is_err());
        // Error is consumed; the next call succeeds.
        assert!(provider.search_movies("anything", 1).await.is_ok());
    }
}
