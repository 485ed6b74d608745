//! Audit query handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use cinefile_core::{AuditFilter, AuditRecord};

use crate::state::AppState;

/// Maximum allowed limit for audit queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for audit queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for audit queries
#[derive(Debug, Deserialize)]
pub struct AuditParams {
    pub event_type: Option<String>,
    pub request_id: Option<String>,
    pub user_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for audit queries
#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub records: Vec<AuditRecord>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct AuditErrorResponse {
    pub error: String,
}

/// Query the audit log, newest first.
pub async fn query_audit(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditParams>,
) -> Result<Json<AuditResponse>, (StatusCode, Json<AuditErrorResponse>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut filter = AuditFilter::new().with_limit(limit).with_offset(offset);

    if let Some(ref event_type) = params.event_type {
        filter = filter.with_event_type(event_type);
    }
    if let Some(ref request_id) = params.request_id {
        filter = filter.with_request_id(request_id);
    }
    if let Some(user_id) = params.user_id {
        filter = filter.with_user_id(user_id);
    }

    let records = state.audit_store().query(&filter).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AuditErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let total = state.audit_store().count(&filter).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AuditErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(AuditResponse {
        records,
        total,
        limit,
        offset,
    }))
}
