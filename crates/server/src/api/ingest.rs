//! Catalog-ingestion event handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use cinefile_core::{IngestionEvent, ReconcileOutcome};

use crate::state::AppState;

/// A new file was ingested into the catalog; reconcile it against pending
/// requests. The body carries the file's caption or filename as free text.
pub async fn ingest_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<IngestionEvent>,
) -> Json<ReconcileOutcome> {
    let outcome = state.reconciler().handle_event(&event).await;
    Json(outcome)
}
