//! Metadata search handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use cinefile_core::MovieSummary;

use crate::state::AppState;

/// Request body for a movie search
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    /// Free-text movie title query
    pub query: String,
    /// Result page (1-based)
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Response for a movie search
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<MovieSummary>,
    pub page: u32,
}

/// Search the metadata provider for movies.
///
/// A provider failure degrades to an empty result list - the caller sees
/// "no movies found", never an error.
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchBody>,
) -> Json<SearchResponse> {
    let query = body.query.trim();
    if query.len() < 2 {
        return Json(SearchResponse {
            results: Vec::new(),
            page: body.page,
        });
    }

    let results = match state.metadata().search_movies(query, body.page).await {
        Ok(results) => results,
        Err(e) => {
            warn!("Metadata search for '{}' failed: {}", query, e);
            Vec::new()
        }
    };

    let per_page = state.config().requests.results_per_page as usize;
    let results = results.into_iter().take(per_page).collect();

    Json(SearchResponse {
        results,
        page: body.page,
    })
}
