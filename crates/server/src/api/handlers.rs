use axum::{extract::State, http::StatusCode, Json};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

use cinefile_core::SanitizedConfig;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let families = state.metrics_registry().gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&families, &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
