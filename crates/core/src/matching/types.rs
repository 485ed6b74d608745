//! Result types for availability decisions.

use serde::{Deserialize, Serialize};

use crate::library::CatalogEntry;

/// Binary availability decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
}

/// Outcome of scoring one query against a candidate set.
///
/// Ephemeral - produced per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The decision against the configured threshold.
    pub decision: Availability,
    /// Best-scoring catalog entry, present whenever any candidate was scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<CatalogEntry>,
    /// Combined score of the best candidate, 0-100.
    pub score: f32,
}

impl MatchResult {
    /// An unavailable result with no candidate scored.
    pub fn unavailable() -> Self {
        Self {
            decision: Availability::Unavailable,
            matched: None,
            score: 0.0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.decision == Availability::Available
    }
}
