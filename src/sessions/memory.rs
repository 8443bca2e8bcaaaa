//! In-process session store. History is lost on restart.

use std::sync::Mutex;

use chrono::{SubsecRound, Utc};

use super::{NewSession, ProxySession, SessionStore, StoreError};

struct Inner {
    sessions: Vec<ProxySession>,
    next_id: i64,
}

pub struct MemorySessionStore {
    inner: Mutex<Inner>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                sessions: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn list(&self, user_id: &str) -> Result<Vec<ProxySession>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        let mut sessions: Vec<_> = inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| {
            b.last_accessed
                .cmp(&a.last_accessed)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(sessions)
    }

    fn create(&self, session: NewSession) -> Result<ProxySession, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        let record = ProxySession {
            id: inner.next_id,
            user_id: session.user_id,
            url: session.url,
            title: session.title,
            last_accessed: Utc::now().trunc_subsecs(6),
            is_active: session.is_active,
        };
        inner.next_id += 1;
        inner.sessions.push(record.clone());
        Ok(record)
    }

    fn delete(&self, id: i64, user_id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        let before = inner.sessions.len();
        inner
            .sessions
            .retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(inner.sessions.len() != before)
    }

    fn delete_by_user(&self, user_id: &str) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        let before = inner.sessions.len();
        inner.sessions.retain(|s| s.user_id != user_id);
        Ok(before - inner.sessions.len())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
