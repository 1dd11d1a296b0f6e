//! Catalog resource fetching.
//!
//! Everything the pipelines read comes from catalog resource URLs. The
//! [`Fetch`] trait is the seam between pipeline logic and the network:
//! production code uses [`HttpFetcher`], tests inject an in-memory map.
//! There are no retries and no caching; the same URL may be fetched many
//! times in one run.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

/// A source of catalog resources addressed by URL.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch one resource and parse the response body as JSON.
    ///
    /// Non-success responses are errors carrying the response status.
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// HTTP-backed fetcher used by both pipelines.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let response = response
            .error_for_status()
            .with_context(|| format!("request to {} returned an error status", url))?;

        response
            .json::<Value>()
            .await
            .with_context(|| format!("response from {} is not valid JSON", url))
    }
}
