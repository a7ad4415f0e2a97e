//! Tool for fetching earnings history

use async_trait::async_trait;
use finie_core::Result as CoreResult;
use finie_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{AlphaVantageClient, QuarterlyEarnings, RetryPolicy, with_retry};
use crate::cache::{CacheKey, MarketCache};
use crate::config::FinieConfig;
use crate::error::{MarketError, Result};

/// Tool for fetching quarterly earnings and EPS surprises
pub struct EarningsDataTool {
    alpha_vantage: Option<AlphaVantageClient>,
    cache: MarketCache,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct EarningsParams {
    symbol: String,
    #[serde(default = "default_quarters")]
    quarters: usize,
}

fn default_quarters() -> usize {
    4
}

impl EarningsDataTool {
    /// Create a new earnings data tool
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

    async fn fetch_earnings(&self, params: EarningsParams) -> Result<Value> {
        let symbol = params.symbol.to_uppercase();
        let quarters = params.quarters.clamp(1, 12);

        let Some(client) = &self.alpha_vantage else {
            return Err(MarketError::Config(
                "Alpha Vantage API key required for earnings data \
                 (set ALPHA_VANTAGE_API_KEY)"
                    .to_string(),
            ));
        };

        let cache_key = CacheKey::new(&symbol, "earnings", json!({ "quarters": quarters }));

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                let history =
                    with_retry(self.retry, || client.get_quarterly_earnings(&symbol)).await?;

                let reports: Vec<_> = history
                    .iter()
                    .take(quarters)
                    .map(quarterly_report_json)
                    .collect();

                let beats = reports
                    .iter()
                    .filter(|r| r["surprise_percent"].as_f64().is_some_and(|s| s > 0.0))
                    .count();

                Ok::<_, MarketError>(json!({
                    "symbol": symbol,
                    "quarters_reported": reports.len(),
                    "eps_beats": beats,
                    "quarterly_earnings": reports,
                    "data_provider": "Alpha Vantage",
                }))
            })
            .await?;

        Ok(result)
    }
}

/// Reshape one quarterly report, computing the surprise when absent
fn quarterly_report_json(report: &QuarterlyEarnings) -> Value {
    let actual = parse_eps(report.reported_eps.as_deref());
    let estimate = parse_eps(report.estimated_eps.as_deref());

    let surprise = parse_eps(report.surprise_percentage.as_deref())
        .or_else(|| surprise_percent(actual, estimate));

    json!({
        "fiscal_quarter_ending": report.fiscal_date_ending,
        "reported_date": report.reported_date,
        "eps_actual": actual,
        "eps_estimate": estimate,
        "surprise_percent": surprise,
    })
}

/// Parse an EPS field ("None" means the figure was not reported)
fn parse_eps(value: Option<&str>) -> Option<f64> {
    match value {
        Some("None") | None => None,
        Some(v) => v.parse().ok(),
    }
}

/// EPS surprise as a percentage of the estimate
fn surprise_percent(actual: Option<f64>, estimate: Option<f64>) -> Option<f64> {
    match (actual, estimate) {
        (Some(a), Some(e)) if e != 0.0 => Some((a - e) / e.abs() * 100.0),
        _ => None,
    }
}

#[async_trait]
impl Tool for EarningsDataTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: EarningsParams = serde_json::from_value(params)
            .map_err(|e| finie_core::Error::Processing(format!("Invalid parameters: {e}")))?;

        Ok(self.fetch_earnings(params).await?)
    }

    fn name(&self) -> &'static str {
        "earnings_data"
    }

    fn description(&self) -> &'static str {
        "Fetch recent quarterly earnings for a stock: reported vs. estimated EPS \
         with surprise percentages. Requires an Alpha Vantage API key."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'AAPL', 'GOOGL')"
                },
                "quarters": {
                    "type": "integer",
                    "description": "Number of recent quarters to return (1-12)",
                    "default": 4
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

    fn report(
        actual: Option<&str>,
        estimate: Option<&str>,
        surprise: Option<&str>,
    ) -> QuarterlyEarnings {
        QuarterlyEarnings {
            fiscal_date_ending: "2025-06-30".to_string(),
            reported_date: Some("2025-07-31".to_string()),
            reported_eps: actual.map(String::from),
            estimated_eps: estimate.map(String::from),
            surprise_percentage: surprise.map(String::from),
        }
    }

    #[test]
    fn test_surprise_percent() {
        // 0.89 actual vs 0.85 estimate is a +4.7% beat
        let s = surprise_percent(Some(0.89), Some(0.85)).unwrap();
        assert!((s - 4.705_882).abs() < 1e-3);

        // Negative estimates divide by the magnitude
        let s = surprise_percent(Some(-0.10), Some(-0.20)).unwrap();
        assert!((s - 50.0).abs() < 1e-9);

        assert!(surprise_percent(Some(1.0), Some(0.0)).is_none());
        assert!(surprise_percent(None, Some(1.0)).is_none());
    }

    #[test]
    fn test_quarterly_report_uses_provider_surprise() {
        let r = report(Some("1.40"), Some("1.35"), Some("3.7"));
        let value = quarterly_report_json(&r);
        assert_eq!(value["surprise_percent"], 3.7);
    }

    #[test]
    fn test_quarterly_report_computes_missing_surprise() {
        let r = report(Some("1.10"), Some("1.00"), None);
        let value = quarterly_report_json(&r);
        let s = value["surprise_percent"].as_f64().unwrap();
        assert!((s - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_quarterly_report_handles_none_fields() {
        let r = report(Some("None"), None, Some("None"));
        let value = quarterly_report_json(&r);
        assert!(value["eps_actual"].is_null());
        assert!(value["surprise_percent"].is_null());
    }

    #[test]
    fn test_tool_metadata() {
        let config = FinieConfig::default();
        let cache = MarketCache::new(Duration::from_secs(3600));
        let tool = EarningsDataTool::new(&config, cache);

        assert_eq!(tool.name(), "earnings_data");
        assert!(!tool.description().is_empty());
    }

    #[tokio::test]
    async fn test_execute_without_api_key() {
        let config = FinieConfig::default();
        let cache = MarketCache::new(Duration::from_secs(3600));
        let tool = EarningsDataTool::new(&config, cache);

        let result = tool.execute(json!({"symbol": "AAPL"})).await;
        assert!(result.is_err());
    }
}
