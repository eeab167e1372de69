//! Core data models for AVVO reviews
//!
//! This module contains the credentials used to authenticate against the AVVO
//! API and the review records it returns, plus the clients that fetch them.

pub mod reviews;
pub mod transport;

pub use reviews::{ReviewsClient, API_URL, DEFAULT_CACHE_TTL_SECS};
pub use transport::{FetchError, HttpTransport, ReqwestTransport};

use std::fmt;

use base64::{prelude::BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling the client configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No AVVO account identity (the lawyer's email address) was given
    #[error("You must pass a username and a password to use the AVVO reviews client (missing username)")]
    MissingIdentity,

    /// No AVVO password was given
    #[error("You must pass a username and a password to use the AVVO reviews client (missing password)")]
    MissingSecret,
}

/// AVVO account credentials used for HTTP Basic authentication
///
/// The API authenticates every request, so the pair is kept for the lifetime
/// of the client and never changes.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identity: String,
    secret: String,
}

impl Credentials {
    /// Creates credentials, rejecting an empty identity or secret
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Result<Self, ConfigError> {
        let identity = identity.into();
        let secret = secret.into();

        if identity.is_empty() {
            return Err(ConfigError::MissingIdentity);
        }
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        Ok(Self { identity, secret })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Value for the `Authorization` header: `Basic base64(identity:secret)`
    pub fn authorization_header(&self) -> String {
        let token = BASE64_STANDARD.encode(format!("{}:{}", self.identity, self.secret));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A single review as returned by the AVVO API
///
/// Fields are passed through exactly as received; nothing is validated and
/// `body` may carry HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    /// Star rating from 0 to 5; 0 means the reviewer gave no rating
    pub overall_rating: u8,
    pub title: String,
    pub body: String,
    /// Link to the full review on avvo.com
    pub url: String,
    pub posted_by: String,
}

impl Review {
    /// Five-star gauge such as `★★★☆☆`, or `None` when the review is unrated
    pub fn stars(&self) -> Option<String> {
        if self.overall_rating == 0 {
            return None;
        }
        let filled = usize::from(self.overall_rating.min(5));
        Some(format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled)))
    }
}
