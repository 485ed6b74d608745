//! Matching engine - availability decisions over noisy catalog filenames.
//!
//! Given a query title and a set of catalog entries, the engine normalizes
//! both sides, scores each candidate with three complementary similarity
//! measures, and renders a binary available/unavailable decision against a
//! single global threshold.

mod engine;
mod similarity;
mod types;

pub use engine::{MatchConfig, MatchEngine};
pub use similarity::{partial_ratio, ratio, token_set_ratio, token_sort_ratio};
pub use types::{Availability, MatchResult};
