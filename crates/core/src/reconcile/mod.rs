//! Completion reconciliation - matching new files back to pending requests.
//!
//! Every catalog-ingestion event (a new file announcement) runs through two
//! strategies: an authoritative explicit-identifier extraction, and a fuzzy
//! title/year fallback for files announced without a tag. Either way, every
//! matching pending request completes independently and its requester is
//! notified best-effort.

mod reconciler;
mod types;

pub use reconciler::{CompletionReconciler, ReconcilerConfig};
pub use types::{IngestionEvent, ReconcileOutcome, ReconcilePath};
