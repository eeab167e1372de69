//! HTTP transport used by the reviews client
//!
//! The client only needs "GET this URL with this `Authorization` header and
//! give me the body", so that is all [`HttpTransport`] asks for. Tests swap in
//! in-memory fakes; the binary uses [`ReqwestTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use thiserror::Error;

/// Default timeout for a single API request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur when fetching from the AVVO API
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (DNS, connect, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP request failed with status {0}")]
    Status(String),

    /// Response body was not valid JSON
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Performs authenticated GET requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues `GET url` with the given `Authorization` header value and
    /// returns the response body
    async fn get(&self, url: &str, authorization: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    async fn get(&self, url: &str, authorization: &str) -> Result<String, FetchError> {
        (**self).get(url, authorization).await
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    async fn get(&self, url: &str, authorization: &str) -> Result<String, FetchError> {
        (**self).get(url, authorization).await
    }
}

/// [`HttpTransport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client for making requests
    http_client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default request timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, authorization: &str) -> Result<String, FetchError> {
        let response = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.to_string()));
        }

        Ok(response.text().await?)
    }
}
