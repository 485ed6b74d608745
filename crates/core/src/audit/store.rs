use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::AuditEvent;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A persisted audit event
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// Database row id (0 before insertion)
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    /// Stable event type tag for filtering
    pub event_type: String,
    /// Request this event concerns, when it concerns exactly one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// User this event concerns, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// The full event payload
    pub data: AuditEvent,
}

/// Filter for querying audit events
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub request_id: Option<String>,
    pub event_type: Option<String>,
    pub user_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self {
            limit: 100,
            offset: 0,
            ..Default::default()
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_time_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for audit storage backends
pub trait AuditStore: Send + Sync {
    /// Insert an audit record
    fn insert(&self, record: &AuditRecord) -> Result<(), AuditError>;

    /// Query audit records matching the filter, newest first
    fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError>;

    /// Count records matching the filter
    fn count(&self, filter: &AuditFilter) -> Result<i64, AuditError>;
}
