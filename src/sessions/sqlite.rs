//! SQLite-backed session store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, Row};

use super::{NewSession, ProxySession, SessionStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS proxy_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    url TEXT NOT NULL,
    title TEXT,
    last_accessed TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
);
CREATE INDEX IF NOT EXISTS idx_proxy_sessions_user
    ON proxy_sessions (user_id, last_accessed DESC);
";

pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

// Fixed precision keeps lexical order equal to chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: String) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| StoreError::Timestamp(raw))
}

struct RawSession {
    id: i64,
    user_id: String,
    url: String,
    title: Option<String>,
    last_accessed: String,
    is_active: bool,
}

impl RawSession {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            url: row.get(2)?,
            title: row.get(3)?,
            last_accessed: row.get(4)?,
            is_active: row.get(5)?,
        })
    }

    fn into_session(self) -> Result<ProxySession, StoreError> {
        Ok(ProxySession {
            id: self.id,
            user_id: self.user_id,
            url: self.url,
            title: self.title,
            last_accessed: parse_timestamp(self.last_accessed)?,
            is_active: self.is_active,
        })
    }
}

impl SessionStore for SqliteSessionStore {
    fn list(&self, user_id: &str) -> Result<Vec<ProxySession>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, url, title, last_accessed, is_active
             FROM proxy_sessions
             WHERE user_id = ?1
             ORDER BY last_accessed DESC, id DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id], RawSession::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawSession::into_session).collect()
    }

    fn create(&self, session: NewSession) -> Result<ProxySession, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        // Stored at microsecond precision; return exactly what a later list reads.
        let last_accessed = Utc::now().trunc_subsecs(6);
        conn.execute(
            "INSERT INTO proxy_sessions (user_id, url, title, last_accessed, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.user_id,
                session.url,
                session.title,
                format_timestamp(&last_accessed),
                session.is_active,
            ],
        )?;

        Ok(ProxySession {
            id: conn.last_insert_rowid(),
            user_id: session.user_id,
            url: session.url,
            title: session.title,
            last_accessed,
            is_active: session.is_active,
        })
    }

    fn delete(&self, id: i64, user_id: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let removed = conn.execute(
            "DELETE FROM proxy_sessions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    fn delete_by_user(&self, user_id: &str) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(conn.execute(
            "DELETE FROM proxy_sessions WHERE user_id = ?1",
            params![user_id],
        )?)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
