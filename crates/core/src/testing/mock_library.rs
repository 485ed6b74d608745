//! Mock library catalog for testing.

use std::sync::{Arc, Mutex};

use crate::library::{CatalogEntry, LibraryCatalog, LibraryError};
use crate::title::normalize;

/// In-memory mock of the legacy library.
///
/// Matches the substring-lookup semantics of the SQLite implementation; can
/// be switched into failure mode to verify that the decision path degrades
/// to unavailable instead of erroring.
pub struct MockLibrary {
    entries: Arc<Mutex<Vec<CatalogEntry>>>,
    failing: Arc<Mutex<bool>>,
}

impl Default for MockLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLibrary {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every subsequent operation fail.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn check_failing(&self) -> Result<(), LibraryError> {
        if *self.failing.lock().unwrap() {
            Err(LibraryError::Database("mock failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl LibraryCatalog for MockLibrary {
    fn find_candidates(
        &self,
        cleaned_title: &str,
        year: Option<i32>,
        limit: u32,
    ) -> Result<Vec<CatalogEntry>, LibraryError> {
        self.check_failing()?;

        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .filter(|e| normalize(&e.filename).joined().contains(cleaned_title))
            .filter(|e| match (year, e.year) {
                (Some(wanted), Some(actual)) => wanted == actual,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn insert(&self, entry: &CatalogEntry) -> Result<(), LibraryError> {
        self.check_failing()?;
        // Mirror the SQLite implementation: a missing year is recovered from
        // the filename when possible.
        let mut entry = entry.clone();
        entry.year = entry.year.or_else(|| crate::title::extract_year(&entry.filename));
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn count(&self) -> Result<u64, LibraryError> {
        self.check_failing()?;
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_substring_lookup() {
        let library = MockLibrary::new();
        library
            .insert(&CatalogEntry {
                filename: "Movie.Name.1080p.mkv".to_string(),
                year: None,
            })
            .unwrap();

        let found = library.find_candidates("movie name", None, 5).unwrap();
        assert_eq!(found.len(), 1);

        let missed = library.find_candidates("other title", None, 5).unwrap();
        assert!(missed.is_empty());
    }

    #[test]
    fn test_mock_failure_mode() {
        let library = MockLibrary::new();
        library.set_failing(true);
        assert!(library.find_candidates("anything", None, 5).is_err());
    }
}
