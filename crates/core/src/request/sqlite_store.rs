//! SQLite-backed request store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{NewRequest, QuotaStatus, Request, RequestError, RequestStatus, RequestStore};

/// SQLite-backed request store.
pub struct SqliteRequestStore {
    conn: Mutex<Connection>,
}

impl SqliteRequestStore {
    /// Create a new SQLite request store, creating the database file and
    /// tables if needed.
    pub fn new(path: &Path) -> Result<Self, RequestError> {
        let conn = Connection::open(path).map_err(|e| RequestError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite request store (useful for testing).
    pub fn in_memory() -> Result<Self, RequestError> {
        let conn =
            Connection::open_in_memory().map_err(|e| RequestError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), RequestError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS requests (
                id TEXT PRIMARY KEY,
                requester_id INTEGER NOT NULL,
                tmdb_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                year INTEGER,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_requests_requester_status
                ON requests(requester_id, status);
            CREATE INDEX IF NOT EXISTS idx_requests_tmdb_id ON requests(tmdb_id);
            CREATE INDEX IF NOT EXISTS idx_requests_created_at ON requests(created_at);
            "#,
        )
        .map_err(|e| RequestError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_request(row: &rusqlite::Row) -> rusqlite::Result<Request> {
        let id: String = row.get(0)?;
        let requester_id: i64 = row.get(1)?;
        let tmdb_id: u32 = row.get(2)?;
        let title: String = row.get(3)?;
        let year: Option<i32> = row.get(4)?;
        let status_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;

        // Timestamps were written by us in RFC 3339; fall back to now on
        // corrupt data rather than failing the whole query.
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let status = RequestStatus::parse(&status_str).unwrap_or(RequestStatus::Pending);

        Ok(Request {
            id,
            requester_id,
            tmdb_id,
            title,
            year,
            status,
            created_at,
            updated_at,
        })
    }
}

const REQUEST_COLUMNS: &str =
    "id, requester_id, tmdb_id, title, year, status, created_at, updated_at";

impl RequestStore for SqliteRequestStore {
    fn check_quota(&self, requester_id: i64, quota: u32) -> Result<QuotaStatus, RequestError> {
        let conn = self.conn.lock().unwrap();

        let sql = format!(
            "SELECT {} FROM requests WHERE requester_id = ? AND status = 'pending'
             ORDER BY created_at DESC LIMIT ?",
            REQUEST_COLUMNS
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![requester_id, quota], Self::row_to_request)
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let mut pending = Vec::new();
        for row in rows {
            pending.push(row.map_err(|e| RequestError::Database(e.to_string()))?);
        }

        let pending_count = pending.len() as u32;
        Ok(QuotaStatus {
            can_request: pending_count < quota,
            pending_count,
            pending,
        })
    }

    fn create(&self, request: NewRequest) -> Result<Request, RequestError> {
        let conn = self.conn.lock().unwrap();

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let status = RequestStatus::Pending;

        conn.execute(
            "INSERT INTO requests (id, requester_id, tmdb_id, title, year, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                request.requester_id,
                request.tmdb_id,
                request.title,
                request.year,
                status.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| RequestError::Database(e.to_string()))?;

        Ok(Request {
            id,
            requester_id: request.requester_id,
            tmdb_id: request.tmdb_id,
            title: request.title,
            year: request.year,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    fn cancel(&self, request_id: &str, requester_id: i64) -> Result<bool, RequestError> {
        let conn = self.conn.lock().unwrap();

        let deleted = conn
            .execute(
                "DELETE FROM requests WHERE id = ? AND requester_id = ?",
                params![request_id, requester_id],
            )
            .map_err(|e| RequestError::Database(e.to_string()))?;

        Ok(deleted > 0)
    }

    fn set_status(&self, request_id: &str, status: RequestStatus) -> Result<bool, RequestError> {
        let conn = self.conn.lock().unwrap();

        let now = Utc::now();
        let updated = conn
            .execute(
                "UPDATE requests SET status = ?, updated_at = ? WHERE id = ?",
                params![status.as_str(), now.to_rfc3339(), request_id],
            )
            .map_err(|e| RequestError::Database(e.to_string()))?;

        Ok(updated > 0)
    }

    fn find_pending_by_tmdb_id(&self, tmdb_id: u32) -> Result<Vec<Request>, RequestError> {
        let conn = self.conn.lock().unwrap();

        let sql = format!(
            "SELECT {} FROM requests WHERE tmdb_id = ? AND status = 'pending'",
            REQUEST_COLUMNS
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![tmdb_id], Self::row_to_request)
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row.map_err(|e| RequestError::Database(e.to_string()))?);
        }

        Ok(requests)
    }

    fn get(&self, request_id: &str) -> Result<Option<Request>, RequestError> {
        let conn = self.conn.lock().unwrap();

        let sql = format!("SELECT {} FROM requests WHERE id = ?", REQUEST_COLUMNS);

        let result = conn.query_row(&sql, params![request_id], Self::row_to_request);

        match result {
            Ok(request) => Ok(Some(request)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RequestError::Database(e.to_string())),
        }
    }

    fn list_pending(&self, limit: u32) -> Result<Vec<Request>, RequestError> {
        let conn = self.conn.lock().unwrap();

        let sql = format!(
            "SELECT {} FROM requests WHERE status = 'pending'
             ORDER BY created_at DESC LIMIT ?",
            REQUEST_COLUMNS
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit], Self::row_to_request)
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row.map_err(|e| RequestError::Database(e.to_string()))?);
        }

        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteRequestStore {
        SqliteRequestStore::in_memory().unwrap()
    }

    fn new_request(requester_id: i64, tmdb_id: u32, title: &str) -> NewRequest {
        NewRequest {
            requester_id,
            tmdb_id,
            title: title.to_string(),
            year: Some(2023),
        }
    }

    #[test]
    fn test_create_request() {
        let store = create_test_store();

        let request = store.create(new_request(42, 603, "The Matrix")).unwrap();

        assert!(!request.id.is_empty());
        assert_eq!(request.requester_id, 42);
        assert_eq!(request.tmdb_id, 603);
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn test_get_request() {
        let store = create_test_store();

        let created = store.create(new_request(42, 603, "The Matrix")).unwrap();
        let fetched = store.get(&created.id).unwrap();

        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().title, "The Matrix");
    }

    #[test]
    fn test_get_nonexistent_request() {
        let store = create_test_store();
        assert!(store.get("nonexistent-id").unwrap().is_none());
    }

    #[test]
    fn test_quota_enforced_after_three_requests() {
        let store = create_test_store();

        for i in 0..3 {
            let status = store.check_quota(42, 3).unwrap();
            assert!(status.can_request, "request {} should be admitted", i);
            store
                .create(new_request(42, 600 + i, &format!("Movie {}", i)))
                .unwrap();
        }

        let status = store.check_quota(42, 3).unwrap();
        assert!(!status.can_request);
        assert_eq!(status.pending_count, 3);
        assert_eq!(status.pending.len(), 3);
    }

    #[test]
    fn test_quota_frees_up_after_cancel() {
        let store = create_test_store();

        for i in 0..3 {
            store
                .create(new_request(42, 600 + i, &format!("Movie {}", i)))
                .unwrap();
        }

        let status = store.check_quota(42, 3).unwrap();
        assert!(!status.can_request);

        let victim = &status.pending[0];
        assert!(store.cancel(&victim.id, 42).unwrap());

        let status = store.check_quota(42, 3).unwrap();
        assert!(status.can_request);
        assert_eq!(status.pending_count, 2);
    }

    #[test]
    fn test_quota_is_per_requester() {
        let store = create_test_store();

        for i in 0..3 {
            store
                .create(new_request(1, 600 + i, &format!("Movie {}", i)))
                .unwrap();
        }

        let other = store.check_quota(2, 3).unwrap();
        assert!(other.can_request);
        assert_eq!(other.pending_count, 0);
    }

    #[test]
    fn test_quota_ignores_terminal_requests() {
        let store = create_test_store();

        for i in 0..3 {
            store
                .create(new_request(42, 600 + i, &format!("Movie {}", i)))
                .unwrap();
        }

        let status = store.check_quota(42, 3).unwrap();
        store
            .set_status(&status.pending[0].id, RequestStatus::Completed)
            .unwrap();

        let status = store.check_quota(42, 3).unwrap();
        assert!(status.can_request);
        assert_eq!(status.pending_count, 2);
    }

    #[test]
    fn test_cancel_wrong_owner_is_noop() {
        let store = create_test_store();

        let request = store.create(new_request(42, 603, "The Matrix")).unwrap();

        assert!(!store.cancel(&request.id, 99).unwrap());
        assert!(store.get(&request.id).unwrap().is_some());
    }

    #[test]
    fn test_cancel_nonexistent_is_noop() {
        let store = create_test_store();
        assert!(!store.cancel("nonexistent-id", 42).unwrap());
    }

    #[test]
    fn test_set_status_stamps_updated_at() {
        let store = create_test_store();

        let request = store.create(new_request(42, 603, "The Matrix")).unwrap();
        assert!(store
            .set_status(&request.id, RequestStatus::Completed)
            .unwrap());

        let fetched = store.get(&request.id).unwrap().unwrap();
        assert_eq!(fetched.status, RequestStatus::Completed);
        assert!(fetched.updated_at >= fetched.created_at);
    }

    #[test]
    fn test_set_status_is_idempotent_for_completed() {
        let store = create_test_store();

        let request = store.create(new_request(42, 603, "The Matrix")).unwrap();

        assert!(store
            .set_status(&request.id, RequestStatus::Completed)
            .unwrap());
        assert!(store
            .set_status(&request.id, RequestStatus::Completed)
            .unwrap());

        let fetched = store.get(&request.id).unwrap().unwrap();
        assert_eq!(fetched.status, RequestStatus::Completed);
    }

    #[test]
    fn test_set_status_unknown_id_reports_no_effect() {
        let store = create_test_store();
        assert!(!store
            .set_status("nonexistent-id", RequestStatus::Completed)
            .unwrap());
    }

    #[test]
    fn test_find_pending_by_tmdb_id_many_requesters() {
        let store = create_test_store();

        store.create(new_request(1, 4523, "Movie Name")).unwrap();
        store.create(new_request(2, 4523, "Movie Name")).unwrap();
        store.create(new_request(3, 999, "Other Movie")).unwrap();

        let pending = store.find_pending_by_tmdb_id(4523).unwrap();
        assert_eq!(pending.len(), 2);

        // Completed requests drop out of the result.
        store
            .set_status(&pending[0].id, RequestStatus::Completed)
            .unwrap();
        assert_eq!(store.find_pending_by_tmdb_id(4523).unwrap().len(), 1);
    }

    #[test]
    fn test_list_pending_bounded_and_newest_first() {
        let store = create_test_store();

        for i in 0..5 {
            store
                .create(new_request(i, 600 + i as u32, &format!("Movie {}", i)))
                .unwrap();
        }

        let pending = store.list_pending(3).unwrap();
        assert_eq!(pending.len(), 3);
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("requests.db");

        let store = SqliteRequestStore::new(&db_path).unwrap();
        let request = store.create(new_request(42, 603, "The Matrix")).unwrap();

        assert!(db_path.exists());
        assert!(store.get(&request.id).unwrap().is_some());
    }
}
