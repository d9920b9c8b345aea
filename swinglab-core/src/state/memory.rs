//! In-process state store with passive TTL eviction.
//!
//! The production deployment points the engine at an external key-value
//! store; the backtest replay and the test suite use this one. Expired
//! entries are dropped lazily on access — expiry is cleanup, not a
//! correctness dependency.

use super::{StateStore, StateStoreError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// HashMap-backed store, safe to share across threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|map| map.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StateStoreError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| StateStoreError::Unavailable("store mutex poisoned".into()))?;

        match map.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                map.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StateStoreError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| StateStoreError::Unavailable("store mutex poisoned".into()))?;

        map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StateStoreError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| StateStoreError::Unavailable("store mutex poisoned".into()))?;
        map.remove(key);
        Ok(())
    }
}
