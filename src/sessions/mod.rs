//! Session history storage.
//!
//! # Data Flow
//! ```text
//! config.storage.backend
//!     → open_store() at startup (memory or sqlite)
//!     → Arc<dyn SessionStore> injected into handler state
//!     → /api/sessions routes (list, create, delete)
//! ```
//!
//! # Design Decisions
//! - The relay route never reads or writes this store
//! - Implementation chosen once at startup; no runtime fallback
//! - Every operation is scoped to the owning user

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

/// One visited page in a user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySession {
    pub id: i64,
    pub user_id: String,
    pub url: String,
    pub title: Option<String>,
    pub last_accessed: DateTime<Utc>,
    pub is_active: bool,
}

/// Fields supplied when recording a visit.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: String,
    pub url: String,
    pub title: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("stored timestamp '{0}' is not RFC 3339")]
    Timestamp(String),

    #[error("storage.sqlite_path is required for the sqlite backend")]
    MissingPath,

    #[error("store lock poisoned")]
    Poisoned,
}

/// Persistence for session history records.
pub trait SessionStore: Send + Sync {
    /// Records of `user_id`, most recently accessed first.
    fn list(&self, user_id: &str) -> Result<Vec<ProxySession>, StoreError>;

    fn create(&self, session: NewSession) -> Result<ProxySession, StoreError>;

    /// Delete one record owned by `user_id`. Returns whether anything was removed.
    fn delete(&self, id: i64, user_id: &str) -> Result<bool, StoreError>;

    /// Delete every record owned by `user_id`, returning how many were removed.
    fn delete_by_user(&self, user_id: &str) -> Result<usize, StoreError>;

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Construct the configured store.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn SessionStore>, StoreError> {
    let store: Arc<dyn SessionStore> = match (config.backend, config.sqlite_path.as_deref()) {
        (StorageBackend::Sqlite, Some(path)) => Arc::new(SqliteSessionStore::open(path)?),
        (StorageBackend::Sqlite, None) => return Err(StoreError::MissingPath),
        (StorageBackend::Memory, _) => Arc::new(MemorySessionStore::new()),
    };

    tracing::info!(backend = store.backend(), "Session store ready");
    Ok(store)
}
