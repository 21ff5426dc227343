//! Catalog transport trait - abstraction over the HTTP layer
//!
//! The cache and the sprite renderer talk to this trait rather than to
//! reqwest directly, so tests can substitute an in-memory fake.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

/// Retrieval backend for catalog JSON and sprite bytes
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Fetch and parse a JSON document. Non-2xx responses are errors.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;

    /// Fetch a raw body (sprite images)
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// Transport identifier for logging
    fn name(&self) -> &'static str;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("teamdex/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }

        Ok(response)
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.send(url)
            .await?
            .json()
            .await
            .map_err(|e| FetchError::decode(url, e))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let body = self
            .send(url)
            .await?
            .bytes()
            .await
            .map_err(|e| FetchError::transport(url, e))?;
        Ok(body.to_vec())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
