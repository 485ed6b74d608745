//! SQLite-backed audit store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{AuditError, AuditEvent, AuditFilter, AuditRecord, AuditStore};

/// SQLite-backed audit store.
pub struct SqliteAuditStore {
    conn: Mutex<Connection>,
}

impl SqliteAuditStore {
    /// Open (or create) the audit database.
    pub fn new(path: &Path) -> Result<Self, AuditError> {
        let conn = Connection::open(path).map_err(|e| AuditError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory audit store (useful for testing).
    pub fn in_memory() -> Result<Self, AuditError> {
        let conn =
            Connection::open_in_memory().map_err(|e| AuditError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), AuditError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                request_id TEXT,
                user_id INTEGER,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);
            CREATE INDEX IF NOT EXISTS idx_audit_event_type ON audit_log(event_type);
            CREATE INDEX IF NOT EXISTS idx_audit_request_id ON audit_log(request_id);
            "#,
        )
        .map_err(|e| AuditError::Database(e.to_string()))?;

        Ok(())
    }

    fn build_where_clause(filter: &AuditFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref request_id) = filter.request_id {
            conditions.push("request_id = ?");
            params.push(Box::new(request_id.clone()));
        }

        if let Some(ref event_type) = filter.event_type {
            conditions.push("event_type = ?");
            params.push(Box::new(event_type.clone()));
        }

        if let Some(user_id) = filter.user_id {
            conditions.push("user_id = ?");
            params.push(Box::new(user_id));
        }

        if let Some(from) = filter.from {
            conditions.push("timestamp >= ?");
            params.push(Box::new(from.to_rfc3339()));
        }

        if let Some(to) = filter.to {
            conditions.push("timestamp <= ?");
            params.push(Box::new(to.to_rfc3339()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<AuditRecord> {
        let id: i64 = row.get(0)?;
        let timestamp_str: String = row.get(1)?;
        let event_type: String = row.get(2)?;
        let request_id: Option<String> = row.get(3)?;
        let user_id: Option<i64> = row.get(4)?;
        let data_json: String = row.get(5)?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let data: AuditEvent = serde_json::from_str(&data_json).unwrap_or(
            AuditEvent::ServiceStopped {
                reason: "unparseable audit payload".to_string(),
            },
        );

        Ok(AuditRecord {
            id,
            timestamp,
            event_type,
            request_id,
            user_id,
            data,
        })
    }
}

impl AuditStore for SqliteAuditStore {
    fn insert(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let conn = self.conn.lock().unwrap();

        let data_json = serde_json::to_string(&record.data)
            .map_err(|e| AuditError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO audit_log (timestamp, event_type, request_id, user_id, data)
             VALUES (?, ?, ?, ?, ?)",
            params![
                record.timestamp.to_rfc3339(),
                record.event_type,
                record.request_id,
                record.user_id,
                data_json,
            ],
        )
        .map_err(|e| AuditError::Database(e.to_string()))?;

        Ok(())
    }

    fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT id, timestamp, event_type, request_id, user_id, data FROM audit_log {}
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
            where_clause
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AuditError::Database(e.to_string()))?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_record)
            .map_err(|e| AuditError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e| AuditError::Database(e.to_string()))?);
        }

        Ok(records)
    }

    fn count(&self, filter: &AuditFilter) -> Result<i64, AuditError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!("SELECT COUNT(*) FROM audit_log {}", where_clause);

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| AuditError::Database(e.to_string()))
    }
}
