//! In-process response cache backed by Moka

use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;
use serde_json::Value;

use super::{ResponseCache, MAX_TTL_SECS};

/// Upper bound on the number of responses held in memory
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: Value,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with
struct PerEntryTtl;

impl Expiry<String, MemoryEntry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &MemoryEntry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &MemoryEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Cache that keeps responses in memory for the lifetime of the process
///
/// Expired entries are evicted by Moka's housekeeping, and the cache never
/// holds more than its configured capacity.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, MemoryEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Creates a cache holding at most `max_entries` responses
    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();
        Self { entries }
    }

    /// Number of live entries after pending evictions have run
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: &Value, ttl_secs: u64) {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.clone(),
                ttl: Duration::from_secs(ttl_secs.min(MAX_TTL_SECS)),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let cache = MemoryCache::new();
        assert!(cache.get("/lawyers/1/reviews.json").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let cache = MemoryCache::new();
        let value = json!([{"overall_rating": 5}]);

        cache.set("/lawyers/1/reviews.json", &value, 1440);

        assert_eq!(cache.get("/lawyers/1/reviews.json"), Some(value));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_not_returned() {
        let cache = MemoryCache::new();
        cache.set("key", &json!("stale"), 0);
        thread::sleep(Duration::from_millis(10));

        assert!(cache.get("key").is_none());
    }

    #[test]
    fn test_entries_keep_their_own_ttl() {
        let cache = MemoryCache::new();
        cache.set("short", &json!(1), 0);
        cache.set("long", &json!(2), 1440);
        thread::sleep(Duration::from_millis(10));

        assert!(cache.get("short").is_none());
        assert_eq!(cache.get("long"), Some(json!(2)));
    }

    #[test]
    fn test_overwrite_takes_new_ttl() {
        let cache = MemoryCache::new();
        cache.set("key", &json!("old"), 1440);
        cache.set("key", &json!("new"), 0);
        thread::sleep(Duration::from_millis(10));

        assert!(cache.get("key").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("key", &json!(1), 1440);
        cache.set("key", &json!(2), 1440);

        assert_eq!(cache.get("key"), Some(json!(2)));
    }

    #[test]
    fn test_distinct_endpoints_do_not_grow_past_capacity() {
        let cache = MemoryCache::with_capacity(10);
        for lawyer_id in 0..200 {
            cache.set(&format!("/lawyers/{}/reviews.json", lawyer_id), &json!([]), 1440);
        }

        assert!(cache.len() <= 10, "cache holds {} entries", cache.len());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let cache = MemoryCache::new();
        cache.set("key", &json!(true), u64::MAX);

        assert_eq!(cache.get("key"), Some(json!(true)));
    }
}
