//! REST API client for Kalshi market data

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::common::errors::{BotError, Result};
use crate::common::traits::MarketDataSource;
use crate::common::types::MarketSnapshot;
use crate::config::types::{KalshiConfig, REDACTED};

/// Default request timeout, bounding how long a stalled API can hold a cycle
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST API client for Kalshi
#[derive(Clone)]
pub struct KalshiRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the trade API
    base_url: String,
    /// Optional API key, sent as a bearer token
    api_key: Option<String>,
}

impl fmt::Debug for KalshiRestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KalshiRestClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .finish()
    }
}

impl KalshiRestClient {
    /// Create a new REST client (unauthenticated)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &KalshiConfig, timeout: Duration) -> Result<Self> {
        let client = Self::with_timeout(&config.base_url, timeout)?;
        Ok(match &config.api_key {
            Some(key) => client.with_api_key(key.clone()),
            None => client,
        })
    }

    /// Set the API key for requests
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the list of markets
    ///
    /// A `204 No Content` or empty body means the API had nothing to report
    /// and yields `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn fetch_market_data(&self) -> Result<Option<MarketSnapshot>> {
        let url = format!("{}/markets", self.base_url);
        debug!("Fetching markets from: {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::InvalidResponse(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let snapshot: MarketSnapshot = serde_json::from_str(&body)?;
        debug!("Fetched {} markets", snapshot.markets.len());
        Ok(Some(snapshot))
    }
}

#[async_trait]
impl MarketDataSource for KalshiRestClient {
    async fn fetch_snapshot(&self) -> Result<Option<MarketSnapshot>> {
        self.fetch_market_data().await
    }

    fn source_name(&self) -> &'static str {
        "Kalshi"
    }
}
