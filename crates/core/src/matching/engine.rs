//! The availability decision engine.

use crate::library::CatalogEntry;
use crate::title::normalize;

use super::similarity::{partial_ratio, token_set_ratio, token_sort_ratio};
use super::types::{Availability, MatchResult};

/// Configuration for the matching engine.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum combined score (0-100) for an available decision.
    pub threshold: f32,
    /// Weight for the order-insensitive token-set ratio.
    pub token_set_weight: f32,
    /// Weight for the order-sensitive token-sort ratio.
    pub token_sort_weight: f32,
    /// Weight for the partial/substring ratio.
    pub partial_weight: f32,
    /// Maximum year difference before the mismatch penalty applies.
    pub year_tolerance: i32,
    /// Multiplier applied to the score on a year mismatch.
    pub year_penalty: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 90.0,
            // Set overlap is the primary signal, sort order penalizes
            // different word sets, substring containment is a tiebreaker.
            token_set_weight: 0.5,
            token_sort_weight: 0.3,
            partial_weight: 0.2,
            // Re-releases and regional release dates shift catalog years by
            // one or two, so the mismatch penalty is soft, not a reject.
            year_tolerance: 2,
            year_penalty: 0.5,
        }
    }
}

/// Scores a query against catalog entries and decides availability.
///
/// Read-only: the engine never mutates anything and leaves audit logging of
/// decisions to its caller.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    /// Create an engine with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom config.
    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Decide whether a title is already present among the candidates.
    ///
    /// An empty candidate list short-circuits to unavailable without any
    /// scoring.
    pub fn decide_availability(
        &self,
        title: &str,
        year: Option<i32>,
        candidates: &[CatalogEntry],
    ) -> MatchResult {
        if candidates.is_empty() {
            return MatchResult::unavailable();
        }

        let query = normalize(title).joined();

        let mut best_score = 0.0f32;
        let mut best_match: Option<&CatalogEntry> = None;

        for candidate in candidates {
            let score = self.score_candidate(&query, year, candidate);
            if score > best_score || best_match.is_none() {
                best_score = score;
                best_match = Some(candidate);
            }
        }

        let decision = if best_score >= self.config.threshold {
            Availability::Available
        } else {
            Availability::Unavailable
        };

        MatchResult {
            decision,
            matched: best_match.cloned(),
            score: best_score,
        }
    }

    /// Combined weighted score for one candidate, 0-100.
    fn score_candidate(&self, query: &str, year: Option<i32>, candidate: &CatalogEntry) -> f32 {
        let cleaned = normalize(&candidate.filename).joined();

        let set = token_set_ratio(query, &cleaned);
        let sort = token_sort_ratio(query, &cleaned);
        let partial = partial_ratio(query, &cleaned);

        let mut score = set * self.config.token_set_weight
            + sort * self.config.token_sort_weight
            + partial * self.config.partial_weight;

        if let (Some(query_year), Some(candidate_year)) = (year, candidate.year) {
            if (query_year - candidate_year).abs() > self.config.year_tolerance {
                score *= self.config.year_penalty;
            }
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(filename: &str, year: Option<i32>) -> CatalogEntry {
        CatalogEntry {
            filename: filename.to_string(),
            year,
        }
    }

    #[test]
    fn test_empty_candidates_short_circuit() {
        let engine = MatchEngine::new();
        let result = engine.decide_availability("The Matrix", Some(1999), &[]);
        assert!(!result.is_available());
        assert!(result.matched.is_none());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_identical_titles_score_100() {
        let engine = MatchEngine::new();
        let candidates = [entry("Movie.Name.1080p.BluRay.x264-GROUP.mkv", Some(2023))];

        let result = engine.decide_availability("Movie Name", Some(2023), &candidates);
        assert!(result.is_available());
        assert_eq!(result.score, 100.0);
        assert!(result.matched.is_some());
    }

    #[test]
    fn test_disjoint_titles_unavailable() {
        let engine = MatchEngine::new();
        let candidates = [entry("Something.Else.Entirely.720p.mkv", None)];

        let result = engine.decide_availability("Movie Name", None, &candidates);
        assert!(!result.is_available());
        assert!(result.score < 60.0, "got {}", result.score);
    }

    #[test]
    fn test_year_mismatch_penalty() {
        let engine = MatchEngine::new();
        let same_year = [entry("Movie Name 2023 1080p.mkv", Some(2023))];
        let far_year = [entry("Movie Name 2023 1080p.mkv", Some(2020))];

        let matched = engine.decide_availability("Movie Name 2023", Some(2023), &same_year);
        let penalized = engine.decide_availability("Movie Name 2023", Some(2023), &far_year);

        // Years differing by 3 halve the score.
        assert_eq!(penalized.score, matched.score * 0.5);
    }

    #[test]
    fn test_year_within_tolerance_not_penalized() {
        let engine = MatchEngine::new();
        let candidates = [entry("Movie Name.mkv", Some(2022))];

        let result = engine.decide_availability("Movie Name", Some(2023), &candidates);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_year_penalty_crosses_threshold() {
        // Perfect text match scaled by 0.5 falls below a 95 threshold.
        let engine = MatchEngine::with_config(MatchConfig {
            threshold: 95.0,
            ..MatchConfig::default()
        });
        let exact = [entry("Movie Name.mkv", Some(2023))];
        let shifted = [entry("Movie Name.mkv", Some(2020))];

        assert!(engine
            .decide_availability("Movie Name", Some(2023), &exact)
            .is_available());
        assert!(!engine
            .decide_availability("Movie Name", Some(2023), &shifted)
            .is_available());
    }

    #[test]
    fn test_missing_year_side_skips_reconciliation() {
        let engine = MatchEngine::new();
        let candidates = [entry("Movie Name.mkv", None)];

        let result = engine.decide_availability("Movie Name", Some(1950), &candidates);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_best_candidate_wins() {
        let engine = MatchEngine::new();
        let candidates = [
            entry("Unrelated.Film.1080p.mkv", None),
            entry("Movie.Name.2160p.WEB-DL.mkv", None),
            entry("Another.Movie.720p.mkv", None),
        ];

        let result = engine.decide_availability("Movie Name", None, &candidates);
        assert!(result.is_available());
        assert_eq!(
            result.matched.as_ref().unwrap().filename,
            "Movie.Name.2160p.WEB-DL.mkv"
        );
    }

    #[test]
    fn test_sequel_subtitle_partial_credit() {
        let engine = MatchEngine::new();
        let candidates = [entry("Movie.Name.Revenge.Of.The.Sequel.1080p.mkv", None)];

        let result = engine.decide_availability("Movie Name", None, &candidates);
        // Token-set and partial reward containment, token-sort does not; the
        // combined score lands between the two extremes.
        assert!(result.score > 60.0 && result.score < 100.0, "got {}", result.score);
    }
}
