use serde::{Deserialize, Serialize};

/// Audit event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // System events
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
    },

    // Availability decisions
    AvailabilityChecked {
        /// Who asked
        user_id: i64,
        /// External movie identifier
        tmdb_id: u32,
        /// Title that was checked
        title: String,
        /// Whether the movie was found in the library
        available: bool,
        /// Best match score (0-100)
        score: f32,
        /// Filename of the best match, if any candidate was scored
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matched_filename: Option<String>,
    },

    // Request lifecycle
    RequestCreated {
        request_id: String,
        requester_id: i64,
        tmdb_id: u32,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        year: Option<i32>,
    },
    RequestCancelled {
        request_id: String,
        requester_id: i64,
    },
    RequestStatusChanged {
        request_id: String,
        /// "completed" or "rejected"
        to_status: String,
        /// Operator decision vs. automatic completion
        changed_by: String,
    },

    // Ingestion reconciliation
    IngestionReconciled {
        /// "explicit_id" or "fuzzy"
        path: String,
        /// Identifier extracted from the event text, when present
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tmdb_id: Option<u32>,
        /// How many pending requests completed
        completed_count: u32,
        /// Event text that triggered the sweep (truncated upstream)
        text: String,
    },

    // Notification failures are silent to users but visible to operators
    NotificationFailed {
        recipient_id: i64,
        error: String,
    },
}

impl AuditEvent {
    /// Stable type tag for filtering.
    pub fn event_type(&self) -> &'static str {
        match self {
            AuditEvent::ServiceStarted { .. } => "service_started",
            AuditEvent::ServiceStopped { .. } => "service_stopped",
            AuditEvent::AvailabilityChecked { .. } => "availability_checked",
            AuditEvent::RequestCreated { .. } => "request_created",
            AuditEvent::RequestCancelled { .. } => "request_cancelled",
            AuditEvent::RequestStatusChanged { .. } => "request_status_changed",
            AuditEvent::IngestionReconciled { .. } => "ingestion_reconciled",
            AuditEvent::NotificationFailed { .. } => "notification_failed",
        }
    }

    /// Request this event concerns, when it concerns exactly one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            AuditEvent::RequestCreated { request_id, .. }
            | AuditEvent::RequestCancelled { request_id, .. }
            | AuditEvent::RequestStatusChanged { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// User this event concerns, when known.
    pub fn user_id(&self) -> Option<i64> {
        match self {
            AuditEvent::AvailabilityChecked { user_id, .. } => Some(*user_id),
            AuditEvent::RequestCreated { requester_id, .. }
            | AuditEvent::RequestCancelled { requester_id, .. } => Some(*requester_id),
            AuditEvent::NotificationFailed { recipient_id, .. } => Some(*recipient_id),
            _ => None,
        }
    }
}
