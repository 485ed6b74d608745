//! Request storage trait.

use thiserror::Error;

use super::types::{NewRequest, QuotaStatus, Request, RequestStatus};

/// Error type for request store operations.
///
/// Invalid references (unknown id, wrong owner) are NOT errors: those
/// operations report a boolean "no effect" outcome instead.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Trait for request storage backends.
///
/// Each operation is atomic with respect to the request collection. Quota
/// admission is a two-step contract: callers run `check_quota` and then
/// `create`, treating the pair as one conceptual admission decision. Two
/// racing admissions for one requester can transiently overshoot the quota
/// by one; the quota is a UX throttle, not a safety invariant.
pub trait RequestStore: Send + Sync {
    /// Check a requester's pending-request quota.
    ///
    /// Reads up to `quota` most-recent pending requests, newest first.
    fn check_quota(&self, requester_id: i64, quota: u32) -> Result<QuotaStatus, RequestError>;

    /// Insert a new pending request. Does NOT re-check the quota.
    fn create(&self, request: NewRequest) -> Result<Request, RequestError>;

    /// Remove a request iff it exists and belongs to the requester.
    ///
    /// Returns whether a removal occurred; an unknown id or a different
    /// owner is a no-op, not an error.
    fn cancel(&self, request_id: &str, requester_id: i64) -> Result<bool, RequestError>;

    /// Transition a request's status and stamp `updated_at`.
    ///
    /// Returns whether a matching record existed. Monotonicity is the
    /// caller's responsibility: callers only move pending requests to
    /// completed or rejected, and re-applying completed is a no-op change.
    fn set_status(&self, request_id: &str, status: RequestStatus) -> Result<bool, RequestError>;

    /// Every pending request referencing the given external movie id.
    ///
    /// Several requesters can ask for the same movie; all of them complete
    /// together when it arrives.
    fn find_pending_by_tmdb_id(&self, tmdb_id: u32) -> Result<Vec<Request>, RequestError>;

    /// Fetch a request by id.
    fn get(&self, request_id: &str) -> Result<Option<Request>, RequestError>;

    /// Most-recent pending requests across all requesters, newest first.
    ///
    /// Bounded scan feeding the reconciler's fuzzy fallback.
    fn list_pending(&self, limit: u32) -> Result<Vec<Request>, RequestError>;
}
