//! Cache manager for persisting API responses to disk
//!
//! Provides a `CacheManager` that stores decoded API responses as JSON files
//! with expiry timestamps.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::{ResponseCache, MAX_TTL_SECS};

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Key the entry was written under
    key: String,
    /// The cached response
    data: Value,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData {
    /// The cached response
    pub data: Value,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Manages reading and writing cached responses to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/avvo-reviews/` on Linux). Each cache entry includes an expiry timestamp.
/// [`CacheManager::read`] still returns expired entries (with `is_expired = true`),
/// while the [`ResponseCache`] implementation only hands out fresh ones.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "avvo-reviews")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    ///
    /// The file is named after the SHA-256 of the key, so every endpoint path
    /// gets its own file and no key can escape the cache directory.
    fn cache_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.cache_dir.join(format!("{}.json", hex::encode(digest)))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes a response to the cache with a specified TTL (time-to-live) in seconds
    ///
    /// # Arguments
    /// * `key` - Endpoint path the response belongs to (e.g., "/lawyers/42/reviews.json")
    /// * `data` - The decoded response
    /// * `ttl_secs` - How long the cache entry should be considered fresh
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn write(&self, key: &str, data: &Value, ttl_secs: u64) -> std::io::Result<()> {
        self.ensure_dir()?;

        let now = Utc::now();
        let entry = CacheEntry {
            key: key.to_string(),
            data: data.clone(),
            cached_at: now,
            expires_at: now + Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.cache_path(key), json)
    }

    /// Reads a response from the cache
    ///
    /// Returns `None` if the cache entry doesn't exist, cannot be parsed or was
    /// written under a different key.
    /// Returns `Some(CachedData)` with `is_expired = true` if the entry exists but has expired.
    pub fn read(&self, key: &str) -> Option<CachedData> {
        let path = self.cache_path(key);
        let content = fs::read_to_string(path).ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;

        if entry.key != key {
            tracing::warn!(key, stored_key = %entry.key, "cache file belongs to another key");
            return None;
        }

        let now = Utc::now();
        let is_expired = now >= entry.expires_at;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired,
        })
    }
}

impl ResponseCache for CacheManager {
    fn get(&self, key: &str) -> Option<Value> {
        let cached = self.read(key)?;
        if cached.is_expired {
            tracing::debug!(key, cached_at = %cached.cached_at, "cache entry expired");
            return None;
        }
        Some(cached.data)
    }

    fn set(&self, key: &str, value: &Value, ttl_secs: u64) {
        if let Err(error) = self.write(key, value, ttl_secs) {
            tracing::warn!(key, dir = %self.cache_dir.display(), %error, "failed to write cache entry");
        }
    }
}
