//! Process-local session store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{SessionStore, SessionToken};
use crate::error::Result;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    // None when the TTL runs past what Instant can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// A session store held in memory.
///
/// Clones share the same entries. An entry is expired once its TTL has
/// fully elapsed, so a zero TTL expires immediately.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<(SessionToken, String), Entry>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries, including expired ones not yet
    /// purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, token: &SessionToken, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let entries = self.entries.lock();
        Ok(entries
            .get(&(token.clone(), key.to_string()))
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    fn put(&self, token: &SessionToken, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl);
        self.entries.lock().insert(
            (token.clone(), key.to_string()),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn remove(&self, token: &SessionToken, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .remove(&(token.clone(), key.to_string()))
            .is_some_and(|entry| entry.is_live(now)))
    }

    fn purge_expired(&self) -> Result<usize> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            log::debug!("purged {purged} expired session entries");
        }
        Ok(purged)
    }
}
