//! Tool for fetching fundamental metrics

use async_trait::async_trait;
use finie_core::Result as CoreResult;
use finie_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{AlphaVantageClient, RetryPolicy, with_retry};
use crate::cache::{CacheKey, MarketCache};
use crate::config::FinieConfig;
use crate::error::{MarketError, Result};

/// Tool for fetching fundamental stock data
pub struct FundamentalMetricsTool {
    alpha_vantage: Option<AlphaVantageClient>,
    cache: MarketCache,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct FundamentalParams {
    symbol: String,
}

impl FundamentalMetricsTool {
    /// Create a new fundamental metrics tool
    pub fn new(config: &FinieConfig, cache: MarketCache) -> Self {
        let alpha_vantage = config
            .alpha_vantage_api_key
            .as_ref()
            .map(|key| AlphaVantageClient::new(key.clone(), 5));

        Self {
            alpha_vantage,
            cache,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base: config.retry_backoff_base,
            },
        }
    }

    async fn fetch_fundamentals(&self, params: FundamentalParams) -> Result<Value> {
        let symbol = params.symbol.to_uppercase();

        let Some(client) = &self.alpha_vantage else {
            return Err(MarketError::Config(
                "Alpha Vantage API key required for fundamental data \
                 (set ALPHA_VANTAGE_API_KEY)"
                    .to_string(),
            ));
        };

        let cache_key = CacheKey::new(&symbol, "fundamentals", json!({}));

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                let overview =
                    with_retry(self.retry, || client.get_company_overview(&symbol)).await?;

                let mut result = json!({
                    "symbol": symbol,
                    "name": overview.name,
                    "exchange": overview.exchange,
                    "sector": overview.sector,
                    "industry": overview.industry,
                    "data_provider": "Alpha Vantage",
                });

                if let Some(cap) = parse_field(overview.market_cap.as_deref()) {
                    result["market_cap"] = json!(cap);
                    result["market_cap_formatted"] = json!(format_market_cap(cap));
                }

                if let Some(pe) = parse_field(overview.pe_ratio.as_deref()) {
                    result["pe_ratio"] = json!(pe);
                    result["pe_interpretation"] = json!(interpret_pe(pe));
                }

                if let Some(yield_val) = parse_field(overview.dividend_yield.as_deref()) {
                    result["dividend_yield"] = json!(yield_val);
                    result["dividend_yield_percent"] =
                        json!(format!("{:.2}%", yield_val * 100.0));
                }

                if let Some(eps) = parse_field(overview.eps.as_deref()) {
                    result["eps"] = json!(eps);
                }

                if let Some(book_value) = parse_field(overview.book_value.as_deref()) {
                    result["book_value"] = json!(book_value);
                }

                if let Some(revenue) = parse_field(overview.revenue_ttm.as_deref()) {
                    result["revenue_ttm"] = json!(revenue);
                    result["revenue_ttm_formatted"] = json!(format_market_cap(revenue));
                }

                if let Some(margin) = parse_field(overview.profit_margin.as_deref()) {
                    result["profit_margin"] = json!(margin);
                }

                if let Some(roe) = parse_field(overview.return_on_equity.as_deref()) {
                    result["return_on_equity_ttm"] = json!(roe);
                }

                Ok::<_, MarketError>(result)
            })
            .await?;

        Ok(result)
    }
}

/// Parse an Alpha Vantage numeric field ("None" and "-" mean absent)
fn parse_field(value: Option<&str>) -> Option<f64> {
    match value {
        Some("None") | Some("-") | None => None,
        Some(v) => v.parse().ok(),
    }
}

/// Format a dollar amount in human-readable form
fn format_market_cap(cap: f64) -> String {
    if cap >= 1_000_000_000_000.0 {
        format!("${:.2}T", cap / 1_000_000_000_000.0)
    } else if cap >= 1_000_000_000.0 {
        format!("${:.2}B", cap / 1_000_000_000.0)
    } else if cap >= 1_000_000.0 {
        format!("${:.2}M", cap / 1_000_000.0)
    } else {
        format!("${cap:.2}")
    }
}

/// Interpret a P/E ratio
fn interpret_pe(pe: f64) -> &'static str {
    if pe < 0.0 {
        "Negative (company is not profitable)"
    } else if pe < 15.0 {
        "Low (potentially undervalued or slow growth)"
    } else if pe < 25.0 {
        "Moderate (fairly valued)"
    } else if pe < 50.0 {
        "High (potentially overvalued or high growth)"
    } else {
        "Very High (very expensive or very high growth expectations)"
    }
}

#[async_trait]
impl Tool for FundamentalMetricsTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: FundamentalParams = serde_json::from_value(params)
            .map_err(|e| finie_core::Error::Processing(format!("Invalid parameters: {e}")))?;

        Ok(self.fetch_fundamentals(params).await?)
    }

    fn name(&self) -> &'static str {
        "fundamental_metrics"
    }

    fn description(&self) -> &'static str {
        "Fetch fundamental metrics for a stock: market cap, P/E ratio, EPS, dividend \
         yield, book value, revenue, profit margin, and return on equity. \
         Requires an Alpha Vantage API key."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'AAPL', 'GOOGL')"
                }
            },
            "required": ["symbol"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_market_cap() {
        assert_eq!(format_market_cap(1_500_000_000_000.0), "$1.50T");
        assert_eq!(format_market_cap(50_000_000_000.0), "$50.00B");
        assert_eq!(format_market_cap(250_000_000.0), "$250.00M");
        assert_eq!(format_market_cap(1234.5), "$1234.50");
    }

    #[test]
    fn test_interpret_pe() {
        assert!(interpret_pe(-5.0).contains("Negative"));
        assert!(interpret_pe(10.0).contains("Low"));
        assert!(interpret_pe(20.0).contains("Moderate"));
        assert!(interpret_pe(35.0).contains("High"));
        assert!(interpret_pe(75.0).contains("Very High"));
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field(Some("29.5")), Some(29.5));
        assert_eq!(parse_field(Some("None")), None);
        assert_eq!(parse_field(Some("-")), None);
        assert_eq!(parse_field(None), None);
        assert_eq!(parse_field(Some("garbage")), None);
    }

    #[test]
    fn test_tool_metadata() {
        let config = FinieConfig::default();
        let cache = MarketCache::new(Duration::from_secs(3600));
        let tool = FundamentalMetricsTool::new(&config, cache);

        assert_eq!(tool.name(), "fundamental_metrics");
        assert!(!tool.description().is_empty());
    }

    #[tokio::test]
    async fn test_execute_without_api_key() {
        let config = FinieConfig::default();
        let cache = MarketCache::new(Duration::from_secs(3600));
        let tool = FundamentalMetricsTool::new(&config, cache);

        let result = tool.execute(json!({"symbol": "AAPL"})).await;
        assert!(result.is_err());
    }
}
