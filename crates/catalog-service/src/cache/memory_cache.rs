//! Process-local cache backend.
//!
//! Used by tests and by local runs without Redis. Expiry is evaluated against
//! a clock that can be moved forward with [`InMemoryCache::advance`], so TTL
//! behaviour can be exercised without sleeping.

use super::CacheInterface;
use async_trait::async_trait;
use catalog_core::CatalogResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory cache with TTL expiry.
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    skew: Mutex<Duration>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            skew: Mutex::new(Duration::ZERO),
        }
    }

    /// Moves the cache clock forward.
    pub fn advance(&self, by: Duration) {
        *self.skew.lock() += by;
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = self.now();
        self.entries.lock().values().filter(|e| e.expires_at > now).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn now(&self) -> Instant {
        Instant::now() + *self.skew.lock()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        let now = self.now();
        let mut entries = self.entries.lock();

        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()> {
        let expires_at = self.now() + ttl;
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        let now = self.now();
        Ok(self
            .entries
            .lock()
            .remove(key)
            .is_some_and(|entry| entry.expires_at > now))
    }

    async fn exists(&self, key: &str) -> CatalogResult<bool> {
        Ok(self.get_raw(key).await?.is_some())
    }

    async fn delete_pattern(&self, pattern: &str) -> CatalogResult<u64> {
        let now = self.now();
        let mut removed = 0;

        self.entries.lock().retain(|key, entry| {
            if glob_match(pattern, key) {
                if entry.expires_at > now {
                    removed += 1;
                }
                false
            } else {
                true
            }
        });

        Ok(removed)
    }
}

/// Matches `text` against a pattern where `*` stands for any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();

    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let segments: Vec<&str> = parts.collect();
    let Some((last, middle)) = segments.split_last() else {
        // No wildcard at all: exact match.
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(idx) => rest = &rest[idx + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}
