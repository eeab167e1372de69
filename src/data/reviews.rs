//! AVVO reviews API client
//!
//! Fetches a lawyer's reviews from the AVVO API, caching each decoded
//! response under its endpoint path so repeated lookups within the TTL are
//! served without touching the network.

use serde_json::Value;

use super::transport::{FetchError, HttpTransport};
use super::{Credentials, Review};
use crate::cache::ResponseCache;

/// Base URL of version 1 of the AVVO API
pub const API_URL: &str = "https://api.avvo.com/api/1";

/// Time-to-live for cached API responses in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 1440;

/// Client for fetching lawyer reviews from the AVVO API
///
/// Generic over the HTTP transport and the response cache so either can be
/// replaced, e.g. by in-memory fakes in tests.
#[derive(Debug)]
pub struct ReviewsClient<T, C> {
    credentials: Credentials,
    transport: T,
    cache: C,
    /// Base URL for the API (allows override for testing)
    base_url: String,
    ttl_secs: u64,
}

impl<T: HttpTransport, C: ResponseCache> ReviewsClient<T, C> {
    /// Creates a client against the public AVVO API with the default TTL
    pub fn new(credentials: Credentials, transport: T, cache: C) -> Self {
        Self {
            credentials,
            transport,
            cache,
            base_url: API_URL.to_string(),
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }

    /// Points the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides how long successful responses stay cached
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Endpoint path listing a lawyer's reviews
    pub fn reviews_endpoint(lawyer_id: u64) -> String {
        format!("/lawyers/{}/reviews.json", lawyer_id)
    }

    /// Fetches the reviews for a lawyer
    ///
    /// # Returns
    /// * The reviews as returned by the API
    /// * An empty list when `lawyer_id` is `None` (no request is made)
    /// * An empty list when the request or decoding fails; the cause is
    ///   logged, never returned
    pub async fn get_reviews(&self, lawyer_id: Option<u64>) -> Vec<Review> {
        let Some(lawyer_id) = lawyer_id else {
            tracing::debug!("no lawyer id given, skipping review fetch");
            return Vec::new();
        };

        let endpoint = Self::reviews_endpoint(lawyer_id);
        let value = match self.fetch(&endpoint).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(lawyer_id, %endpoint, %error, "failed to fetch reviews");
                return Vec::new();
            }
        };

        match serde_json::from_value::<Vec<Review>>(value) {
            Ok(reviews) => {
                tracing::debug!(lawyer_id, count = reviews.len(), "fetched reviews");
                reviews
            }
            Err(error) => {
                tracing::warn!(lawyer_id, %endpoint, %error, "API response is not a list of reviews");
                Vec::new()
            }
        }
    }

    /// Returns the decoded response for `endpoint`, from cache when fresh
    ///
    /// A cache miss issues one request; only successful responses are cached,
    /// so a failure is retried on the next call rather than replayed.
    pub async fn fetch(&self, endpoint: &str) -> Result<Value, FetchError> {
        if let Some(cached) = self.cache.get(endpoint) {
            tracing::debug!(endpoint, "cache hit");
            return Ok(cached);
        }

        tracing::debug!(endpoint, "cache miss");
        let value = self.request(endpoint).await?;
        self.cache.set(endpoint, &value, self.ttl_secs);
        Ok(value)
    }

    /// Performs an authenticated GET of `endpoint` and decodes the JSON body
    pub async fn request(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let body = self
            .transport
            .get(&url, &self.credentials.authorization_header())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}
