//! Cache module for storing API responses
//!
//! Responses are cached under their endpoint path for a fixed TTL. The
//! [`ResponseCache`] trait is the seam the reviews client talks to; the disk
//! backed [`CacheManager`] is the default, [`MemoryCache`] keeps entries for the
//! lifetime of the process and [`NoCache`] disables caching entirely.

mod manager;
mod memory;

pub use manager::{CacheManager, CachedData};
pub use memory::MemoryCache;

use serde_json::Value;

/// Upper bound on a single entry's lifetime (ten years)
pub(crate) const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Key-value store with per-entry time-to-live
///
/// Implementations handle their own consistency. Callers do no locking around
/// a `get` followed by a `set`, so concurrent writers for the same key simply
/// overwrite each other.
pub trait ResponseCache {
    /// Returns the cached value for `key` if present and not expired
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key` for `ttl_secs` seconds
    fn set(&self, key: &str, value: &Value, ttl_secs: u64);
}

/// Cache that never stores anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResponseCache for NoCache {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&self, _key: &str, _value: &Value, _ttl_secs: u64) {}
}

impl<C: ResponseCache + ?Sized> ResponseCache for &C {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value, ttl_secs: u64) {
        (**self).set(key, value, ttl_secs)
    }
}

impl<C: ResponseCache + ?Sized> ResponseCache for Box<C> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value, ttl_secs: u64) {
        (**self).set(key, value, ttl_secs)
    }
}
