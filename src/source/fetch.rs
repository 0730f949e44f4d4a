//! HTTP implementation of the [`Fetch`] trait.
//!
//! Issues plain GET requests against the configured JSON endpoints.
//! No retries and no backoff: a failed request fails the cycle and the
//! next scheduled cycle is the next opportunity to succeed.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::{Fetch, FetchError, Record};

/// Fetches record payloads over HTTP with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let user_agent = format!("releasewatch/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Record>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(FetchError::new(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        response
            .json::<Vec<Record>>()
            .await
            .map_err(|e| FetchError::new(format!("invalid response body from {}: {}", url, e)))
    }
}
