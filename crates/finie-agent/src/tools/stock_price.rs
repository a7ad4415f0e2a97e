//! Tool for fetching stock price data

use async_trait::async_trait;
use finie_core::Result as CoreResult;
use finie_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{RetryPolicy, YahooFinanceClient, with_retry};
use crate::cache::{CacheKey, MarketCache};
use crate::config::FinieConfig;
use crate::error::Result;

/// Tool for fetching current and historical stock prices
pub struct StockPriceTool {
    yahoo: YahooFinanceClient,
    cache: MarketCache,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct StockPriceParams {
    symbol: String,
    #[serde(default = "default_range")]
    range: String,
    #[serde(default)]
    include_historical: bool,
}

fn default_range() -> String {
    "1mo".to_string()
}

impl StockPriceTool {
    /// Create a new stock price tool
    pub fn new(config: &FinieConfig, cache: MarketCache) -> Self {
        Self {
            yahoo: YahooFinanceClient::new(),
            cache,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base: config.retry_backoff_base,
            },
        }
    }

    async fn fetch_price_data(&self, params: StockPriceParams) -> Result<Value> {
        let symbol = params.symbol.to_uppercase();
        let range = params.range;
        let include_historical = params.include_historical;

        let cache_key = CacheKey::new(
            &symbol,
            "stock_price",
            json!({ "range": &range, "historical": include_historical }),
        );

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                let quote = with_retry(self.retry, || self.yahoo.get_quote(&symbol)).await?;

                let historical = if include_historical {
                    Some(
                        with_retry(self.retry, || {
                            self.yahoo.get_historical_range(&symbol, &range)
                        })
                        .await?,
                    )
                } else {
                    None
                };

                let mut result = json!({
                    "symbol": symbol,
                    "current_quote": {
                        "timestamp": quote.timestamp.to_rfc3339(),
                        "open": quote.open,
                        "high": quote.high,
                        "low": quote.low,
                        "close": quote.close,
                        "volume": quote.volume,
                        "adjusted_close": quote.adjclose,
                    }
                });

                if let Some(historical) = historical {
                    let historical_data: Vec<_> = historical
                        .iter()
                        .map(|q| {
                            json!({
                                "timestamp": q.timestamp.to_rfc3339(),
                                "open": q.open,
                                "high": q.high,
                                "low": q.low,
                                "close": q.close,
                                "volume": q.volume,
                            })
                        })
                        .collect();

                    if let (Some(first), Some(last)) = (historical.first(), historical.last()) {
                        result["period_change_percent"] =
                            json!(period_change_percent(first.close, last.close));
                    }

                    result["range"] = json!(range);
                    result["data_points"] = json!(historical_data.len());
                    result["historical_data"] = json!(historical_data);
                }

                Ok::<_, crate::error::MarketError>(result)
            })
            .await?;

        Ok(result)
    }
}

/// Percentage change between the first and last close of a range
fn period_change_percent(first_close: f64, last_close: f64) -> f64 {
    if first_close == 0.0 {
        return 0.0;
    }
    (last_close - first_close) / first_close * 100.0
}

#[async_trait]
impl Tool for StockPriceTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: StockPriceParams = serde_json::from_value(params)
            .map_err(|e| finie_core::Error::Processing(format!("Invalid parameters: {e}")))?;

        Ok(self.fetch_price_data(params).await?)
    }

    fn name(&self) -> &'static str {
        "stock_price"
    }

    fn description(&self) -> &'static str {
        "Fetch current and historical stock price data for a given ticker symbol. \
         Returns the latest quote and, when requested, historical prices plus the \
         percentage change over the range."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'AAPL', 'GOOGL')"
                },
                "range": {
                    "type": "string",
                    "description": "Time range for historical data",
                    "enum": ["1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"],
                    "default": "1mo"
                },
                "include_historical": {
                    "type": "boolean",
                    "description": "Whether to include historical price data",
                    "default": false
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

    fn make_tool() -> StockPriceTool {
        let config = FinieConfig::default();
        let cache = MarketCache::new(Duration::from_secs(60));
        StockPriceTool::new(&config, cache)
    }

    #[test]
    fn test_tool_metadata() {
        let tool = make_tool();

        assert_eq!(tool.name(), "stock_price");
        assert!(!tool.description().is_empty());

        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["symbol"].is_object());
        assert_eq!(schema["required"][0], "symbol");
    }

    #[test]
    fn test_period_change_percent() {
        assert!((period_change_percent(100.0, 103.0) - 3.0).abs() < 1e-9);
        assert!((period_change_percent(200.0, 150.0) + 25.0).abs() < 1e-9);
        assert_eq!(period_change_percent(0.0, 100.0), 0.0);
    }

    #[tokio::test]
    async fn test_execute_rejects_missing_symbol() {
        let tool = make_tool();
        let result = tool.execute(json!({"range": "1mo"})).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_execute_current_quote() {
        let tool = make_tool();

        let params = json!({
            "symbol": "AAPL",
            "include_historical": false
        });

        let result = tool.execute(params).await.unwrap();
        assert_eq!(result["symbol"], "AAPL");
        assert!(result["current_quote"].is_object());
    }
}
