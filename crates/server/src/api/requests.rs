//! Request lifecycle handlers: admission, cancellation, moderation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use cinefile_core::{
    metrics, AuditEvent, NewRequest, QuotaStatus, Request, RequestStatus,
};

use crate::state::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct RequestErrorResponse {
    pub error: String,
}

/// Request body for creating a request
#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub requester_id: i64,
    pub tmdb_id: u32,
}

/// Response when the requester is at quota
#[derive(Debug, Serialize)]
pub struct QuotaExceededResponse {
    pub error: String,
    #[serde(flatten)]
    pub quota: QuotaStatus,
}

/// Check a requester's quota.
///
/// A storage failure degrades to "cannot request" rather than an error -
/// the admission flow simply refuses until the store recovers.
pub async fn check_quota(
    State(state): State<Arc<AppState>>,
    Path(requester_id): Path<i64>,
) -> Json<QuotaStatus> {
    Json(quota_or_refuse(&state, requester_id))
}

fn quota_or_refuse(state: &AppState, requester_id: i64) -> QuotaStatus {
    let quota = state.config().requests.max_pending;
    match state.requests().check_quota(requester_id, quota) {
        Ok(status) => status,
        Err(e) => {
            warn!("Quota check for {} failed: {}", requester_id, e);
            QuotaStatus {
                can_request: false,
                pending_count: 0,
                pending: Vec::new(),
            }
        }
    }
}

/// Admit a new request: quota check, metadata resolution, insert.
///
/// The quota check and the insert are two separate store operations; two
/// racing admissions can transiently overshoot the quota by one (accepted).
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<Request>), (StatusCode, Json<serde_json::Value>)> {
    let quota_status = quota_or_refuse(&state, body.requester_id);
    if !quota_status.can_request {
        metrics::QUOTA_REFUSALS.inc();
        let response = QuotaExceededResponse {
            error: format!(
                "request limit reached ({}/{})",
                quota_status.pending_count,
                state.config().requests.max_pending
            ),
            quota: quota_status,
        };
        return Err((
            StatusCode::CONFLICT,
            Json(serde_json::to_value(response).unwrap_or_default()),
        ));
    }

    // The request stores the provider's canonical title and year, so the
    // reconciler's fuzzy fallback has clean text to match against.
    let movie = match state.metadata().movie_details(body.tmdb_id).await {
        Ok(details) => details,
        Err(e) => {
            warn!("Metadata details for {} failed: {}", body.tmdb_id, e);
            return Err((
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "no movies found" })),
            ));
        }
    };

    let created = match state.requests().create(NewRequest {
        requester_id: body.requester_id,
        tmdb_id: movie.id,
        title: movie.title.clone(),
        year: movie.year(),
    }) {
        Ok(request) => request,
        Err(e) => {
            warn!("Creating request failed: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "could not create request" })),
            ));
        }
    };

    metrics::REQUESTS_CREATED.inc();
    state.audit().try_emit(AuditEvent::RequestCreated {
        request_id: created.id.clone(),
        requester_id: created.requester_id,
        tmdb_id: created.tmdb_id,
        title: created.title.clone(),
        year: created.year,
    });

    notify_operators(&state, &created).await;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Tell the operator channel about a new request, best-effort.
async fn notify_operators(state: &AppState, request: &Request) {
    let Some(telegram) = state.config().telegram.as_ref() else {
        return;
    };

    let year = request
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let message = format!(
        "📥 *New Movie Request*\n\n🎬 *Title:* {}\n📅 *Year:* {}\n👤 *User:* {}\n🆔 *TMDB ID:* {}",
        request.title, year, request.requester_id, request.tmdb_id
    );

    if let Err(e) = state.notifier().notify(telegram.admin_chat_id, &message).await {
        warn!("Operator notification failed: {}", e);
        metrics::NOTIFICATION_FAILURES.inc();
        state.audit().try_emit(AuditEvent::NotificationFailed {
            recipient_id: telegram.admin_chat_id,
            error: e.to_string(),
        });
    }
}

/// Fetch a request by id.
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Request>, (StatusCode, Json<RequestErrorResponse>)> {
    match state.requests().get(&id) {
        Ok(Some(request)) => Ok(Json(request)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(RequestErrorResponse {
                error: format!("Request not found: {}", id),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RequestErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// Query parameters for cancellation
#[derive(Debug, Deserialize)]
pub struct CancelParams {
    pub requester_id: i64,
}

/// Response for cancellation
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// Cancel a pending request.
///
/// Only the owning requester can cancel; anything else is a no-effect
/// boolean outcome, not an error.
pub async fn cancel_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<CancelParams>,
) -> Json<CancelResponse> {
    let cancelled = match state.requests().cancel(&id, params.requester_id) {
        Ok(cancelled) => cancelled,
        Err(e) => {
            warn!("Cancelling request {} failed: {}", id, e);
            false
        }
    };

    if cancelled {
        metrics::REQUESTS_CANCELLED.inc();
        state.audit().try_emit(AuditEvent::RequestCancelled {
            request_id: id,
            requester_id: params.requester_id,
        });
    }

    Json(CancelResponse { cancelled })
}

/// Request body for an operator status change
#[derive(Debug, Deserialize)]
pub struct SetStatusBody {
    /// "completed" or "rejected"
    pub status: String,
}

/// Response for a status change
#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub updated: bool,
}

/// Operator decision: mark a request completed (uploaded) or rejected.
pub async fn set_request_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetStatusBody>,
) -> Result<Json<SetStatusResponse>, (StatusCode, Json<RequestErrorResponse>)> {
    let status = match RequestStatus::parse(&body.status) {
        Some(status) if status.is_terminal() => status,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(RequestErrorResponse {
                    error: format!("invalid status: {}", body.status),
                }),
            ));
        }
    };

    let updated = match state.requests().set_status(&id, status) {
        Ok(updated) => updated,
        Err(e) => {
            warn!("Updating request {} failed: {}", id, e);
            false
        }
    };

    if updated {
        match status {
            RequestStatus::Completed => {
                metrics::COMPLETIONS.with_label_values(&["operator"]).inc()
            }
            RequestStatus::Rejected => metrics::REJECTIONS.inc(),
            RequestStatus::Pending => {}
        }
        state.audit().try_emit(AuditEvent::RequestStatusChanged {
            request_id: id.clone(),
            to_status: status.as_str().to_string(),
            changed_by: "operator".to_string(),
        });

        notify_requester(&state, &id, status).await;
    }

    Ok(Json(SetStatusResponse { updated }))
}

/// Tell the requester about the operator's decision, best-effort.
async fn notify_requester(state: &AppState, request_id: &str, status: RequestStatus) {
    let request = match state.requests().get(request_id) {
        Ok(Some(request)) => request,
        _ => return,
    };

    let year = request
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let message = match status {
        RequestStatus::Completed => format!(
            "🎉 *Good News!*\n\nYour requested movie has been uploaded:\n\n🎬 *{}* ({})\n\nCheck the file channel for download.",
            request.title, year
        ),
        RequestStatus::Rejected => format!(
            "📭 *Request Update*\n\nYour movie request has been reviewed:\n\n🎬 *{}* ({})\n📊 *Status:* ❌ Rejected\n\nYou can make a new request now.",
            request.title, year
        ),
        RequestStatus::Pending => return,
    };

    if let Err(e) = state
        .notifier()
        .notify(request.requester_id, &message)
        .await
    {
        warn!(
            "Notifying requester {} about {} failed: {}",
            request.requester_id, request_id, e
        );
        metrics::NOTIFICATION_FAILURES.inc();
        state.audit().try_emit(AuditEvent::NotificationFailed {
            recipient_id: request.requester_id,
            error: e.to_string(),
        });
    }
}
