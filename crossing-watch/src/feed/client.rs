//! Crossing feed HTTP client.
//!
//! Provides async methods for the two endpoints of the crossing service:
//! the location listing and the per-crossing state lookup.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::CrossingId;

use super::CrossingSource;
use super::error::FeedError;
use super::types::{LocationDto, StateDto, decode_listing};

/// Default base URL for the crossing feed.
pub const DEFAULT_BASE_URL: &str = "http://train.jpeckham.com:5000";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the crossing feed.
///
/// Uses a semaphore to limit concurrent requests, independent of how many
/// lookups callers issue at once.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// The normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn locations_url(&self) -> String {
        format!("{}/location", self.base_url)
    }

    fn state_url(&self, id: &CrossingId) -> String {
        format!("{}/state/{}", self.base_url, id.as_str())
    }

    /// GET a URL and decode its JSON body.
    ///
    /// Returns `Ok(None)` on 404 so callers can choose the error.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, FeedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FeedError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| FeedError::Json {
                message: format!("{e} (body: {})", body.chars().take(200).collect::<String>()),
            })
    }
}

impl CrossingSource for FeedClient {
    async fn fetch_locations(&self) -> Result<Vec<LocationDto>, FeedError> {
        let url = self.locations_url();
        let entries: Vec<serde_json::Value> =
            self.get_json(&url).await?.ok_or_else(|| FeedError::Api {
                status: 404,
                message: format!("{url} not found"),
            })?;
        Ok(decode_listing(entries))
    }

    async fn fetch_state(&self, id: &CrossingId) -> Result<StateDto, FeedError> {
        let url = self.state_url(id);
        self.get_json(&url)
            .await?
            .ok_or_else(|| FeedError::NotFound(id.clone()))
    }
}
