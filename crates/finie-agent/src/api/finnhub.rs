//! Finnhub API client for company news

use crate::error::{MarketError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

const BASE_URL: &str = "https://finnhub.io/api/v1";
const FREE_TIER_RPM: u32 = 60;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// A company news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    /// News headline
    pub headline: String,
    /// News source
    pub source: String,
    /// Article summary
    pub summary: String,
    /// Article URL
    pub url: String,
    /// Related symbols
    #[serde(default)]
    pub related: String,
}

/// Finnhub client for the company-news endpoint
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubClient {
    /// Create a new client with the given API key and rate limit (req/min)
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(rate_limit)
                .unwrap_or_else(|| NonZeroU32::new(FREE_TIER_RPM).expect("nonzero")),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter,
        }
    }

    /// Create from the `FINNHUB_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FINNHUB_API_KEY").map_err(|_| {
            MarketError::Config("FINNHUB_API_KEY environment variable not set".to_string())
        })?;

        Ok(Self::new(api_key, FREE_TIER_RPM))
    }

    /// Get company news for a symbol within a date window
    ///
    /// `from` and `to` are `YYYY-MM-DD` dates.
    pub async fn get_company_news(
        &self,
        symbol: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<NewsArticle>> {
        self.rate_limiter.until_ready().await;

        let url = format!(
            "{BASE_URL}/company-news?symbol={symbol}&from={from}&to={to}&token={}",
            self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketError::Api(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::Api(format!(
                "Finnhub API error {status}: {body}"
            )));
        }

        response
            .json::<Vec<NewsArticle>>()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse Finnhub response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = FinnhubClient::new("test_key", 60);
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_article_deserialization() {
        let data = json!([{
            "category": "company",
            "datetime": 1722988800,
            "headline": "Apple beats on earnings",
            "id": 1,
            "image": "",
            "related": "AAPL",
            "source": "Reuters",
            "summary": "Apple reported quarterly results above expectations.",
            "url": "https://example.com/article"
        }]);

        let articles: Vec<NewsArticle> = serde_json::from_value(data).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].headline, "Apple beats on earnings");
        assert_eq!(articles[0].related, "AAPL");
    }

    #[tokio::test]
    #[ignore] // Requires network access and a real API key
    async fn test_get_company_news() {
        let client = FinnhubClient::from_env().unwrap();
        let news = client
            .get_company_news("AAPL", "2025-08-01", "2025-08-07")
            .await
            .unwrap();
        assert!(!news.is_empty());
    }
}
