//! Test doubles and fixtures for exercising the core without external
//! infrastructure.
//!
//! These are compiled into the library (not `#[cfg(test)]`) so the server
//! crate's integration tests can inject them too.

mod mock_library;
mod mock_metadata;
mod mock_notifier;

pub use mock_library::MockLibrary;
pub use mock_metadata::{MockMetadataProvider, RecordedMetadataQuery};
pub use mock_notifier::{MockNotifier, SentNotification};

/// Canned data builders shared between test suites.
pub mod fixtures {
    use crate::library::CatalogEntry;
    use crate::metadata::{MovieDetails, MovieSummary};

    /// A movie summary with sensible defaults.
    pub fn movie_summary(id: u32, title: &str, year: i32) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            original_title: None,
            release_date: Some(format!("{}-06-15", year)),
            overview: Some(format!("Overview of {}", title)),
            poster_path: Some(format!("/poster-{}.jpg", id)),
        }
    }

    /// Movie details matching a summary built by `movie_summary`.
    pub fn movie_details(id: u32, title: &str, year: i32) -> MovieDetails {
        MovieDetails {
            id,
            title: title.to_string(),
            original_title: None,
            release_date: Some(format!("{}-06-15", year)),
            runtime_minutes: Some(120),
            overview: Some(format!("Overview of {}", title)),
            poster_path: Some(format!("/poster-{}.jpg", id)),
            genres: vec!["Drama".to_string()],
            vote_average: Some(7.4),
            vote_count: Some(1200),
            imdb_id: None,
        }
    }

    /// A library entry for a release-style filename.
    pub fn catalog_entry(filename: &str) -> CatalogEntry {
        CatalogEntry {
            filename: filename.to_string(),
            year: None,
        }
    }
}
