//! Availability decision flow: query -> normalize -> candidates -> decision.

use std::sync::Arc;

use tracing::warn;

use crate::library::LibraryCatalog;
use crate::matching::{MatchEngine, MatchResult};
use crate::metrics;
use crate::title::normalize;

/// How many library candidates the bounded lookup returns.
const CANDIDATE_LIMIT: u32 = 5;

/// Answers "is this movie already in the library".
///
/// A library failure degrades to unavailable-with-no-match rather than
/// surfacing an error: the caller's flow continues and the user simply sees
/// the movie as requestable.
pub struct AvailabilityService {
    library: Arc<dyn LibraryCatalog>,
    engine: MatchEngine,
}

impl AvailabilityService {
    pub fn new(library: Arc<dyn LibraryCatalog>, engine: MatchEngine) -> Self {
        Self { library, engine }
    }

    /// Decide availability of a title against the legacy library.
    pub fn check(&self, title: &str, year: Option<i32>) -> MatchResult {
        let cleaned = normalize(title).joined();

        let candidates = match self.library.find_candidates(&cleaned, year, CANDIDATE_LIMIT) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Library candidate lookup failed: {}", e);
                Vec::new()
            }
        };

        let result = self.engine.decide_availability(title, year, &candidates);

        let label = if result.is_available() {
            "available"
        } else {
            "unavailable"
        };
        metrics::AVAILABILITY_DECISIONS
            .with_label_values(&[label])
            .inc();

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{CatalogEntry, SqliteLibrary};

    fn service_with(entries: &[(&str, Option<i32>)]) -> AvailabilityService {
        let library = SqliteLibrary::in_memory().unwrap();
        for (filename, year) in entries {
            library
                .insert(&CatalogEntry {
                    filename: filename.to_string(),
                    year: *year,
                })
                .unwrap();
        }
        AvailabilityService::new(Arc::new(library), MatchEngine::new())
    }

    #[test]
    fn test_check_finds_existing_movie() {
        let service = service_with(&[("Movie.Name.2023.1080p.BluRay.x264-GROUP.mkv", None)]);

        let result = service.check("Movie Name 2023", Some(2023));
        assert!(result.is_available());
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_check_without_year_matches_any_release() {
        let service = service_with(&[("Movie.Name.1080p.WEB-DL.mkv", None)]);

        let result = service.check("Movie Name", None);
        assert!(result.is_available());
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_check_empty_library_is_unavailable() {
        let service = service_with(&[]);

        let result = service.check("Movie Name", Some(2023));
        assert!(!result.is_available());
        assert!(result.matched.is_none());
    }

    #[test]
    fn test_check_unrelated_library_is_unavailable() {
        let service = service_with(&[("Different.Film.2019.720p.mkv", Some(2019))]);

        let result = service.check("Movie Name", Some(2023));
        assert!(!result.is_available());
    }
}
