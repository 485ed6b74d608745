//! Types for ingestion reconciliation.

use serde::{Deserialize, Serialize};

use crate::request::Request;

/// A catalog-ingestion event: a new file appeared, announced with free text
/// (a caption or the filename itself).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionEvent {
    pub text: String,
}

impl IngestionEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Which reconciliation strategy handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ReconcilePath {
    /// A labeled external identifier was present; fuzzy matching was skipped.
    ExplicitId { tmdb_id: u32 },
    /// No identifier tag; canonical titles were fuzzy-matched.
    Fuzzy,
    /// The event text normalized to nothing; nothing to match.
    Empty,
}

/// Outcome of reconciling one ingestion event.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    /// Strategy that handled the event.
    pub path: ReconcilePath,
    /// Requests transitioned to completed, in scan order.
    pub completed: Vec<Request>,
}

impl ReconcileOutcome {
    pub fn empty(path: ReconcilePath) -> Self {
        Self {
            path,
            completed: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_serialization() {
        let json = serde_json::to_string(&ReconcilePath::ExplicitId { tmdb_id: 4523 }).unwrap();
        assert!(json.contains("\"strategy\":\"explicit_id\""));
        assert!(json.contains("4523"));

        let json = serde_json::to_string(&ReconcilePath::Fuzzy).unwrap();
        assert!(json.contains("fuzzy"));
    }
}
