//! Polymarket Gamma API client.
//!
//! Market discovery only: the Gamma API carries volume, liquidity, outcome
//! prices and resolution dates, which is everything the pipeline screens on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::dto::response::GammaMarket;
use super::settings::ScanConfig;
use crate::domain::market::MarketRecord;
use crate::error::{Error, Result};
use crate::port::MarketProvider;

/// HTTP client for the Polymarket Gamma API.
pub struct PolymarketClient {
    http: HttpClient,
    gamma_url: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl PolymarketClient {
    /// Create a client against `gamma_url` with default HTTP settings and
    /// no retries.
    #[must_use]
    pub fn new(gamma_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            gamma_url: gamma_url.into(),
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            gamma_url: config.gamma_url.trim_end_matches('/').to_string(),
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
        }
    }

    fn markets_url(&self, limit: usize) -> String {
        format!(
            "{}/markets?active=true&closed=false&limit={}",
            self.gamma_url, limit
        )
    }

    async fn get_with_retry<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = match self.http.get(url).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = match response.error_for_status() {
                Ok(response) => response,
                Err(err) => {
                    let server_side = err.status().is_some_and(|s| s.is_server_error());
                    if attempt >= max_attempts || !server_side {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            match response.json::<T>().await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Gamma request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms * u64::from(attempt))).await;
        }
    }

    /// Fetch open markets from the Gamma API.
    pub async fn get_gamma_markets(&self, limit: usize) -> Result<Vec<GammaMarket>> {
        let url = self.markets_url(limit);
        info!(url = %url, "Fetching open markets (Gamma)");

        let markets: Vec<GammaMarket> = self.get_with_retry(&url).await?;
        debug!(count = markets.len(), "Fetched markets from Gamma");
        Ok(markets)
    }
}

#[async_trait]
impl MarketProvider for PolymarketClient {
    fn name(&self) -> &'static str {
        "polymarket"
    }

    async fn list_markets(&self, limit: usize) -> Result<Vec<MarketRecord>> {
        let markets = self
            .get_gamma_markets(limit)
            .await
            .map_err(|e| Error::Provider(format!("Gamma API: {e}")))?;
        Ok(markets
            .into_iter()
            .take(limit)
            .map(MarketRecord::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::polymarket::settings::HttpConfig;

    #[test]
    fn markets_url_requests_open_markets() {
        let client = PolymarketClient::new("https://gamma.test");
        assert_eq!(
            client.markets_url(25),
            "https://gamma.test/markets?active=true&closed=false&limit=25"
        );
    }

    #[test]
    fn from_config_trims_trailing_slash() {
        let config = ScanConfig {
            gamma_url: "https://gamma.test/".into(),
            http: HttpConfig {
                retry_max_attempts: 5,
                ..HttpConfig::default()
            },
            ..ScanConfig::default()
        };
        let client = PolymarketClient::from_config(&config);
        assert!(client.markets_url(1).starts_with("https://gamma.test/markets"));
        assert_eq!(client.retry_max_attempts, 5);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_provider_error() {
        let client = PolymarketClient::new("http://127.0.0.1:9");
        let err = client.list_markets(5).await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }
}

#[cfg(all(test, feature = "integration-tests"))]
mod integration_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn fetches_live_markets() {
        let client = PolymarketClient::from_config(&ScanConfig::default());
        let markets = client.list_markets(5).await.unwrap();
        assert!(markets.len() <= 5);
        for market in &markets {
            assert!((0.0..=1.0).contains(&market.implied_probability));
        }
    }
}
