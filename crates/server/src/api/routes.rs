use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{audit, handlers, ingest, movies, requests, search};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config, metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Audit
        .route("/audit", get(audit::query_audit))
        // Metadata search
        .route("/search", post(search::search_movies))
        // Movies: details and availability
        .route("/movies/{id}", get(movies::get_movie))
        .route("/movies/{id}/availability", get(movies::check_availability))
        // Requests
        .route("/requests", post(requests::create_request))
        .route("/requests/{id}", get(requests::get_request))
        .route("/requests/{id}", delete(requests::cancel_request))
        .route("/requests/{id}/status", post(requests::set_request_status))
        .route("/requests/quota/{requester_id}", get(requests::check_quota))
        // Catalog-ingestion events
        .route("/ingest", post(ingest::ingest_event))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}
