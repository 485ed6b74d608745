//! Movie details and availability handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use cinefile_core::{AuditEvent, MatchResult, MovieDetails};

use crate::state::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct MovieErrorResponse {
    pub error: String,
}

/// Fetch movie details from the metadata provider.
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<MovieDetails>, (StatusCode, Json<MovieErrorResponse>)> {
    match state.metadata().movie_details(id).await {
        Ok(details) => Ok(Json(details)),
        Err(e) => {
            warn!("Metadata details for {} failed: {}", id, e);
            Err((
                StatusCode::NOT_FOUND,
                Json(MovieErrorResponse {
                    error: "no movies found".to_string(),
                }),
            ))
        }
    }
}

/// Query parameters for the availability check
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    /// Who is asking - recorded in the audit log
    pub user_id: Option<i64>,
}

/// Response for an availability check
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub movie: MovieDetails,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Resolve a movie through the metadata provider and decide whether the
/// library already has it.
pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, (StatusCode, Json<MovieErrorResponse>)> {
    let movie = match state.metadata().movie_details(id).await {
        Ok(details) => details,
        Err(e) => {
            warn!("Metadata details for {} failed: {}", id, e);
            return Err((
                StatusCode::NOT_FOUND,
                Json(MovieErrorResponse {
                    error: "no movies found".to_string(),
                }),
            ));
        }
    };

    let result = state.availability().check(&movie.title, movie.year());

    state
        .audit()
        .try_emit(AuditEvent::AvailabilityChecked {
            user_id: params.user_id.unwrap_or(0),
            tmdb_id: movie.id,
            title: movie.title.clone(),
            available: result.is_available(),
            score: result.score,
            matched_filename: result.matched.as_ref().map(|m| m.filename.clone()),
        });

    Ok(Json(AvailabilityResponse { movie, result }))
}
