//! The completion reconciler.

use std::sync::Arc;

use futures::future::join_all;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::{info, warn};

use crate::audit::{AuditEvent, AuditHandle};
use crate::matching::token_set_ratio;
use crate::metrics;
use crate::notify::Notifier;
use crate::request::{Request, RequestStatus, RequestStore};
use crate::title::{extract_year, normalize};

use super::types::{IngestionEvent, ReconcileOutcome, ReconcilePath};

/// Labeled external-identifier token, e.g. `TMDB:4523` or `tmdb_4523`.
static EXPLICIT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)tmdb[:_\- ]*([0-9]+)").unwrap());

/// Configuration for the completion reconciler.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Minimum token-set ratio (0-100) for a fuzzy completion.
    pub threshold: f32,
    /// Maximum year difference for a fuzzy completion.
    pub year_tolerance: i32,
    /// How many most-recent pending requests the fallback scans.
    ///
    /// A deliberate scalability ceiling: the linear scan dominates cost as
    /// pending volume grows, so it stays bounded.
    pub pending_scan_limit: u32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            threshold: 90.0,
            year_tolerance: 2,
            pending_scan_limit: 100,
        }
    }
}

/// Consumes catalog-ingestion events and completes matching pending requests.
///
/// Completion is N independent single-record transitions, not one
/// transaction: a crash mid-sweep is safe to resume because re-applying
/// "set to completed" is a no-op change.
pub struct CompletionReconciler {
    requests: Arc<dyn RequestStore>,
    notifier: Arc<dyn Notifier>,
    audit: Option<AuditHandle>,
    config: ReconcilerConfig,
}

impl CompletionReconciler {
    pub fn new(
        requests: Arc<dyn RequestStore>,
        notifier: Arc<dyn Notifier>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            requests,
            notifier,
            audit: None,
            config,
        }
    }

    /// Attach an audit handle; reconciliation sweeps and notification
    /// failures get recorded.
    pub fn with_audit(mut self, audit: AuditHandle) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Process one ingestion event.
    pub async fn handle_event(&self, event: &IngestionEvent) -> ReconcileOutcome {
        let outcome = match extract_tmdb_id(&event.text) {
            Some(tmdb_id) => self.complete_by_explicit_id(tmdb_id).await,
            None => self.complete_by_fuzzy_match(&event.text).await,
        };

        if let Some(ref audit) = self.audit {
            let (path, tmdb_id) = match outcome.path {
                ReconcilePath::ExplicitId { tmdb_id } => ("explicit_id", Some(tmdb_id)),
                ReconcilePath::Fuzzy => ("fuzzy", None),
                ReconcilePath::Empty => ("empty", None),
            };
            audit
                .emit(AuditEvent::IngestionReconciled {
                    path: path.to_string(),
                    tmdb_id,
                    completed_count: outcome.completed.len() as u32,
                    text: truncate(&event.text, 200),
                })
                .await;
        }

        outcome
    }

    /// Authoritative path: the event carries a labeled identifier, so every
    /// pending request for that movie completes without any fuzzy matching.
    async fn complete_by_explicit_id(&self, tmdb_id: u32) -> ReconcileOutcome {
        let pending = match self.requests.find_pending_by_tmdb_id(tmdb_id) {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Pending lookup for tmdb_id {} failed: {}", tmdb_id, e);
                return ReconcileOutcome::empty(ReconcilePath::ExplicitId { tmdb_id });
            }
        };

        let completed: Vec<Request> = pending
            .into_iter()
            .filter(|request| self.transition(request, "explicit_id"))
            .collect();

        // Each delivery is independent; send them concurrently.
        join_all(completed.iter().map(|r| self.notify_completion(r))).await;

        ReconcileOutcome {
            path: ReconcilePath::ExplicitId { tmdb_id },
            completed,
        }
    }

    /// Fallback path: fuzzy-match the event text against every pending
    /// request's canonical title, bounded by the scan limit. Matching does
    /// not stop at the first hit - one file can satisfy several requests.
    async fn complete_by_fuzzy_match(&self, text: &str) -> ReconcileOutcome {
        let cleaned = normalize(text).joined();
        if cleaned.is_empty() {
            return ReconcileOutcome::empty(ReconcilePath::Empty);
        }
        let event_year = extract_year(text);

        let pending = match self.requests.list_pending(self.config.pending_scan_limit) {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Pending scan failed: {}", e);
                return ReconcileOutcome::empty(ReconcilePath::Fuzzy);
            }
        };

        let mut completed = Vec::new();
        for request in pending {
            let request_title = normalize(&request.title).joined();
            let similarity = token_set_ratio(&cleaned, &request_title);

            let year_matches = match (event_year, request.year) {
                (Some(event), Some(request)) => {
                    (event - request).abs() <= self.config.year_tolerance
                }
                _ => true,
            };

            if similarity >= self.config.threshold
                && year_matches
                && self.transition(&request, "fuzzy")
            {
                completed.push(request);
            }
        }

        join_all(completed.iter().map(|r| self.notify_completion(r))).await;

        ReconcileOutcome {
            path: ReconcilePath::Fuzzy,
            completed,
        }
    }

    /// Transition one request to completed. Returns whether the transition
    /// took effect.
    fn transition(&self, request: &Request, path: &str) -> bool {
        match self.requests.set_status(&request.id, RequestStatus::Completed) {
            Ok(true) => {}
            Ok(false) => {
                warn!("Request {} vanished before completion", request.id);
                return false;
            }
            Err(e) => {
                warn!("Completing request {} failed: {}", request.id, e);
                return false;
            }
        }

        info!(
            request_id = %request.id,
            requester_id = request.requester_id,
            path,
            "request completed"
        );
        metrics::COMPLETIONS.with_label_values(&[path]).inc();
        true
    }

    /// Notify a requester that their movie arrived.
    ///
    /// Best-effort: a delivery failure is recorded but never rolls back the
    /// already-applied transition.
    async fn notify_completion(&self, request: &Request) {
        let message = completion_message(request);
        if let Err(e) = self.notifier.notify(request.requester_id, &message).await {
            warn!(
                "Notifying requester {} about {} failed: {}",
                request.requester_id, request.id, e
            );
            metrics::NOTIFICATION_FAILURES.inc();
            if let Some(ref audit) = self.audit {
                audit
                    .emit(AuditEvent::NotificationFailed {
                        recipient_id: request.requester_id,
                        error: e.to_string(),
                    })
                    .await;
            }
        }
    }
}

/// Extract a labeled TMDB identifier from free text, if present.
pub fn extract_tmdb_id(text: &str) -> Option<u32> {
    EXPLICIT_ID
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn completion_message(request: &Request) -> String {
    let year = request
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "🎉 *Good News!*\n\nYour requested movie has been uploaded:\n\n🎬 *{}* ({})\n\nCheck the file channel for download.",
        request.title, year
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
