//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Availability decisions
//! - Request lifecycle (created, cancelled, moderated)
//! - Ingestion reconciliation (completions by path)
//! - Notification delivery

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Availability decisions by outcome ("available" / "unavailable").
pub static AVAILABILITY_DECISIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinefile_availability_decisions_total",
            "Availability decisions rendered",
        ),
        &["decision"],
    )
    .unwrap()
});

/// Requests created.
pub static REQUESTS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("cinefile_requests_created_total", "Requests created").unwrap()
});

/// Requests cancelled by their requester.
pub static REQUESTS_CANCELLED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cinefile_requests_cancelled_total",
        "Requests cancelled by requester",
    )
    .unwrap()
});

/// Admissions refused because the requester was at quota.
pub static QUOTA_REFUSALS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cinefile_quota_refusals_total",
        "Request admissions refused at quota",
    )
    .unwrap()
});

/// Request completions by path ("explicit_id" / "fuzzy" / "operator").
pub static COMPLETIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cinefile_completions_total", "Request completions"),
        &["path"],
    )
    .unwrap()
});

/// Requests rejected by an operator.
pub static REJECTIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cinefile_rejections_total",
        "Requests rejected by operator",
    )
    .unwrap()
});

/// Notification deliveries that failed (best-effort, never rolled back).
pub static NOTIFICATION_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cinefile_notification_failures_total",
        "Failed notification deliveries",
    )
    .unwrap()
});

/// Register all core metrics with a registry.
///
/// Registering the same collector twice is an error in prometheus, so this
/// should run once at startup.
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(AVAILABILITY_DECISIONS.clone()))?;
    registry.register(Box::new(REQUESTS_CREATED.clone()))?;
    registry.register(Box::new(REQUESTS_CANCELLED.clone()))?;
    registry.register(Box::new(QUOTA_REFUSALS.clone()))?;
    registry.register(Box::new(COMPLETIONS.clone()))?;
    registry.register(Box::new(REJECTIONS.clone()))?;
    registry.register(Box::new(NOTIFICATION_FAILURES.clone()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        let registry = Registry::new();
        register_metrics(&registry).unwrap();

        AVAILABILITY_DECISIONS
            .with_label_values(&["available"])
            .inc();
        COMPLETIONS.with_label_values(&["explicit_id"]).inc();

        let families = registry.gather();
        assert!(!families.is_empty());
    }
}
