//! Legacy library catalog - the existing collection of movie files.
//!
//! The library is a loosely-structured set of filenames accumulated over
//! years. The core only reads it: a bounded substring lookup over cleaned
//! filenames produces the candidate set the matching engine scores.

mod sqlite;
mod types;

pub use sqlite::SqliteLibrary;
pub use types::{CatalogEntry, LibraryError};

/// Trait for the legacy library catalog.
pub trait LibraryCatalog: Send + Sync {
    /// Find candidate entries whose cleaned filename contains the given
    /// cleaned-title substring, optionally restricted to a year.
    ///
    /// Bounded lookup - at most `limit` entries come back; the matching
    /// engine does the real scoring.
    fn find_candidates(
        &self,
        cleaned_title: &str,
        year: Option<i32>,
        limit: u32,
    ) -> Result<Vec<CatalogEntry>, LibraryError>;

    /// Add an entry to the library. Used by ingestion and tests; the
    /// availability decision path never writes.
    fn insert(&self, entry: &CatalogEntry) -> Result<(), LibraryError>;

    /// Total number of entries.
    fn count(&self) -> Result<u64, LibraryError>;
}
