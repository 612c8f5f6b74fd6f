//! Response cache keyed by endpoint and serialized request options
//!
//! Provides a `ResponseCache` that memoizes opaque JSON payloads for a fixed
//! freshness window. The map is guarded by a `parking_lot::RwLock` so a single
//! client instance can be shared across async tasks.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::Value;

/// How long a cached response stays fresh unless the client overrides it
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A single cached response
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached payload
    value: Value,
    /// When the payload was stored
    stored_at: Instant,
}

impl CacheEntry {
    /// Fresh while age is strictly below the TTL; an entry exactly at the
    /// boundary counts as expired
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Map from request key to cached response payload
///
/// At most one entry exists per key; a write to an existing key fully replaces
/// the previous entry. Expiry is checked lazily on read. Removal only happens
/// through `clear` or by overwrite, never through a background sweep.
#[derive(Debug)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates an empty cache with the given freshness window
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the cached payload for `key` if it is still fresh
    ///
    /// An expired entry is left in place and treated as a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry
    pub fn insert(&self, key: String, value: Value) {
        self.entries.write().insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every entry, fresh or expired
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of resident entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("/characters/42".to_string(), json!({"id": 42}));

        assert_eq!(cache.get("/characters/42"), Some(json!({"id": 42})));
    }

    #[test]
    fn test_missing_key_is_a_miss() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        assert!(cache.get("/characters/42").is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss_but_stays_resident() {
        let cache = ResponseCache::new(Duration::from_millis(1));
        cache.insert("/characters/42".to_string(), json!({"id": 42}));

        thread::sleep(Duration::from_millis(10));

        assert!(cache.get("/characters/42").is_none());
        // Expiry is a read-time classification, not a removal
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_entry_is_expired_at_the_boundary() {
        let cache = ResponseCache::new(Duration::from_secs(0));
        cache.insert("/characters/42".to_string(), json!({"id": 42}));

        // Age is compared strictly, so age >= 0 means expired
        assert!(cache.get("/characters/42").is_none());
    }

    #[test]
    fn test_overwrite_replaces_previous_entry() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("/characters/42".to_string(), json!({"hp": 10}));
        cache.insert("/characters/42".to_string(), json!({"hp": 12}));

        assert_eq!(cache.get("/characters/42"), Some(json!({"hp": 12})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("/characters/1".to_string(), json!({"id": 1}));
        cache.insert("/characters/2".to_string(), json!({"id": 2}));

        assert_eq!(cache.get("/characters/1"), Some(json!({"id": 1})));
        assert_eq!(cache.get("/characters/2"), Some(json!({"id": 2})));
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("/characters/1".to_string(), json!({"id": 1}));
        cache.insert("/gamedata/feats".to_string(), json!([]));

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get("/characters/1").is_none());
    }
}
