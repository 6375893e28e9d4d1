//! Key-addressed read cache with explicit invalidation
//!
//! Collection reads are cached under a well-known key; any mutation to a
//! collection invalidates its key so the next read refetches. This keeps
//! the list view and its count at most one round trip stale, and makes the
//! refetch-after-mutation bookkeeping an explicit call instead of implicit
//! library magic.
//!
//! A racing read and revalidation may both store; last writer wins, which
//! is acceptable because reads are idempotent.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Cache key for the URL-mapping collection
pub const URLS_KEY: &str = "urls";

/// Cache key for the admin-user collection
pub const ADMIN_USERS_KEY: &str = "admin-users";

struct CacheEntry {
    value: Value,
    stale: bool,
}

/// Shared snapshot cache keyed by resource name
#[derive(Default)]
pub struct ReadCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ReadCache {
    pub fn new() -> Self {
        ReadCache::default()
    }

    /// Returns the cached value only when present and fresh
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        if entry.stale {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Stores a snapshot and clears the stale bit
    pub fn store<T: Serialize>(&self, key: &str, value: &T) {
        let snapshot = match serde_json::to_value(value) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(key, %err, "failed to snapshot value, dropping cache entry");
                self.lock().remove(key);
                return;
            }
        };
        self.lock().insert(
            key.to_string(),
            CacheEntry {
                value: snapshot,
                stale: false,
            },
        );
    }

    /// Marks a key stale; the snapshot stays for fallback display
    pub fn invalidate(&self, key: &str) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.stale = true;
        }
    }

    /// True for stale or never-fetched keys
    pub fn is_stale(&self, key: &str) -> bool {
        self.lock().get(key).map(|entry| entry.stale).unwrap_or(true)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
