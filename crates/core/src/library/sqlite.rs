//! SQLite-backed legacy library implementation.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::title::{extract_year, normalize};

use super::{CatalogEntry, LibraryCatalog, LibraryError};

/// SQLite-backed library catalog.
///
/// A `cleaned_filename` column is maintained on insert so the candidate
/// lookup can run a simple LIKE without normalizing every row per query.
pub struct SqliteLibrary {
    conn: Mutex<Connection>,
}

impl SqliteLibrary {
    /// Open (or create) the library database.
    pub fn new(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open(path).map_err(|e| LibraryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory library (useful for testing).
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| LibraryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), LibraryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS library (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                cleaned_filename TEXT NOT NULL,
                year INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_library_cleaned ON library(cleaned_filename);
            CREATE INDEX IF NOT EXISTS idx_library_year ON library(year);
            "#,
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;

        Ok(())
    }
}

impl LibraryCatalog for SqliteLibrary {
    fn find_candidates(
        &self,
        cleaned_title: &str,
        year: Option<i32>,
        limit: u32,
    ) -> Result<Vec<CatalogEntry>, LibraryError> {
        let conn = self.conn.lock().unwrap();

        // LIKE special characters in a movie title are rare but possible.
        let pattern = format!(
            "%{}%",
            cleaned_title.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
        );

        let sql = match year {
            Some(_) => {
                "SELECT filename, year FROM library
                 WHERE cleaned_filename LIKE ? ESCAPE '\\' AND year = ? LIMIT ?"
            }
            None => {
                "SELECT filename, year FROM library
                 WHERE cleaned_filename LIKE ? ESCAPE '\\' LIMIT ?"
            }
        };

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let map_row = |row: &rusqlite::Row| {
            Ok(CatalogEntry {
                filename: row.get(0)?,
                year: row.get(1)?,
            })
        };

        let rows = match year {
            Some(y) => stmt.query_map(params![pattern, y, limit], map_row),
            None => stmt.query_map(params![pattern, limit], map_row),
        }
        .map_err(|e| LibraryError::Database(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| LibraryError::Database(e.to_string()))?);
        }

        Ok(entries)
    }

    fn insert(&self, entry: &CatalogEntry) -> Result<(), LibraryError> {
        let conn = self.conn.lock().unwrap();

        let cleaned = normalize(&entry.filename).joined();
        let year = entry.year.or_else(|| extract_year(&entry.filename));

        conn.execute(
            "INSERT INTO library (filename, cleaned_filename, year) VALUES (?, ?, ?)",
            params![entry.filename, cleaned, year],
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;

        Ok(())
    }

    fn count(&self) -> Result<u64, LibraryError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row("SELECT COUNT(*) FROM library", [], |row| row.get(0))
            .map_err(|e| LibraryError::Database(e.to_string()))
    }
}
