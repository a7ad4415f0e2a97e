//! Alpha Vantage API client
//!
//! Used for company fundamentals (OVERVIEW) and earnings history (EARNINGS).
//! Free-tier keys are limited to 5 requests per minute, enforced here with a
//! rate limiter so a burst of tool calls queues instead of erroring.

use crate::error::{MarketError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const FREE_TIER_RPM: u32 = 5;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

/// Company overview data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyOverview {
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Exchange")]
    pub exchange: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    pub market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(rename = "DividendYield")]
    pub dividend_yield: Option<String>,
    #[serde(rename = "EPS")]
    pub eps: Option<String>,
    #[serde(rename = "BookValue")]
    pub book_value: Option<String>,
    #[serde(rename = "RevenueTTM")]
    pub revenue_ttm: Option<String>,
    #[serde(rename = "ProfitMargin")]
    pub profit_margin: Option<String>,
    #[serde(rename = "ReturnOnEquityTTM")]
    pub return_on_equity: Option<String>,
}

/// One quarterly earnings report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterlyEarnings {
    #[serde(rename = "fiscalDateEnding")]
    pub fiscal_date_ending: String,
    #[serde(rename = "reportedDate")]
    pub reported_date: Option<String>,
    #[serde(rename = "reportedEPS")]
    pub reported_eps: Option<String>,
    #[serde(rename = "estimatedEPS")]
    pub estimated_eps: Option<String>,
    #[serde(rename = "surprisePercentage")]
    pub surprise_percentage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EarningsResponse {
    #[serde(rename = "quarterlyEarnings", default)]
    quarterly_earnings: Vec<QuarterlyEarnings>,
}

impl AlphaVantageClient {
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

    /// Create from the `ALPHA_VANTAGE_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ALPHA_VANTAGE_API_KEY").map_err(|_| {
            MarketError::Config("ALPHA_VANTAGE_API_KEY environment variable not set".to_string())
        })?;

        Ok(Self::new(api_key, FREE_TIER_RPM))
    }

    /// Fetch the company overview (fundamentals) for a symbol
    pub async fn get_company_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        let data = self.query("OVERVIEW", symbol).await?;

        let overview: CompanyOverview = serde_json::from_value(data)?;

        // Unknown symbols come back as an empty object, not an HTTP error
        if overview.name.is_none() {
            return Err(MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no company overview returned".to_string(),
            });
        }

        Ok(overview)
    }

    /// Fetch quarterly earnings history for a symbol
    pub async fn get_quarterly_earnings(&self, symbol: &str) -> Result<Vec<QuarterlyEarnings>> {
        let data = self.query("EARNINGS", symbol).await?;

        let earnings: EarningsResponse = serde_json::from_value(data)?;

        if earnings.quarterly_earnings.is_empty() {
            return Err(MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no earnings history returned".to_string(),
            });
        }

        Ok(earnings.quarterly_earnings)
    }

    /// Issue a rate-limited query and surface Alpha Vantage's in-band errors
    async fn query(&self, function: &str, symbol: &str) -> Result<serde_json::Value> {
        self.rate_limiter.until_ready().await;

        let mut params = HashMap::new();
        params.insert("function", function);
        params.insert("symbol", symbol);
        params.insert("apikey", &self.api_key);

        let response = self.client.get(BASE_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(MarketError::AlphaVantage(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response.json().await?;

        // Alpha Vantage reports errors and throttling inside a 200 response
        if let Some(error) = data.get("Error Message") {
            return Err(MarketError::AlphaVantage(error.to_string()));
        }

        if data.get("Note").is_some() || data.get("Information").is_some() {
            return Err(MarketError::RateLimited {
                provider: "Alpha Vantage".to_string(),
            });
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = AlphaVantageClient::new("test_key", 5);
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_overview_deserialization() {
        let data = json!({
            "Symbol": "AAPL",
            "Name": "Apple Inc",
            "Exchange": "NASDAQ",
            "Sector": "TECHNOLOGY",
            "Industry": "ELECTRONIC COMPUTERS",
            "MarketCapitalization": "2800000000000",
            "PERatio": "29.5",
            "DividendYield": "0.0055",
            "EPS": "6.42",
            "BookValue": "4.38",
            "RevenueTTM": "385000000000",
            "ProfitMargin": "0.253",
            "ReturnOnEquityTTM": "1.479"
        });

        let overview: CompanyOverview = serde_json::from_value(data).unwrap();
        assert_eq!(overview.symbol.as_deref(), Some("AAPL"));
        assert_eq!(overview.name.as_deref(), Some("Apple Inc"));
        assert_eq!(overview.pe_ratio.as_deref(), Some("29.5"));
    }

    #[test]
    fn test_earnings_deserialization() {
        let data = json!({
            "symbol": "AAPL",
            "quarterlyEarnings": [
                {
                    "fiscalDateEnding": "2025-06-30",
                    "reportedDate": "2025-07-31",
                    "reportedEPS": "1.40",
                    "estimatedEPS": "1.35",
                    "surprise": "0.05",
                    "surprisePercentage": "3.7"
                }
            ]
        });

        let earnings: EarningsResponse = serde_json::from_value(data).unwrap();
        assert_eq!(earnings.quarterly_earnings.len(), 1);
        assert_eq!(
            earnings.quarterly_earnings[0].reported_eps.as_deref(),
            Some("1.40")
        );
    }

    #[tokio::test]
    #[ignore] // Requires network access and a real API key
    async fn test_get_company_overview() {
        let client = AlphaVantageClient::from_env().unwrap();
        let overview = client.get_company_overview("AAPL").await.unwrap();
        assert_eq!(overview.symbol.as_deref(), Some("AAPL"));
    }
}
