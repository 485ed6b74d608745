//! Core request data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a movie request.
///
/// `Pending` is the only non-terminal state: pending requests move to
/// `Completed` (the file showed up) or `Rejected` (an operator declined),
/// and never transition again afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Completed,
    Rejected,
}

impl RequestStatus {
    /// Stable string form used in the database and API filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "completed" => Some(RequestStatus::Completed),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// A user's request for a movie that is not yet in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Unique request identifier.
    pub id: String,
    /// Identifier of the requesting user.
    pub requester_id: i64,
    /// External movie identifier (TMDB).
    pub tmdb_id: u32,
    /// Canonical movie title as resolved by the metadata provider.
    pub title: String,
    /// Release year, when the metadata provider knew it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Current lifecycle status.
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub requester_id: i64,
    pub tmdb_id: u32,
    pub title: String,
    pub year: Option<i32>,
}

/// Result of a quota check for one requester.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaStatus {
    /// Whether another request may be admitted.
    pub can_request: bool,
    /// Number of currently pending requests.
    pub pending_count: u32,
    /// The pending requests, newest first, for self-service cancellation.
    pub pending: Vec<Request>,
}
