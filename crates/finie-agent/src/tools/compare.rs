//! Tool for comparing multiple stocks side by side

use async_trait::async_trait;
use finie_core::Result as CoreResult;
use finie_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{RetryPolicy, YahooFinanceClient, with_retry};
use crate::cache::{CacheKey, MarketCache};
use crate::config::FinieConfig;
use crate::error::{MarketError, Result};

const MAX_SYMBOLS: usize = 5;

/// Tool for side-by-side comparison of 2-5 stocks
pub struct CompareStocksTool {
    yahoo: YahooFinanceClient,
    cache: MarketCache,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct CompareParams {
    symbols: Vec<String>,
    #[serde(default = "default_range")]
    range: String,
}

fn default_range() -> String {
    "1mo".to_string()
}

impl CompareStocksTool {
    /// Create a new comparison tool
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

    async fn fetch_comparison(&self, params: CompareParams) -> Result<Value> {
        let symbols: Vec<String> = params.symbols.iter().map(|s| s.to_uppercase()).collect();
        let range = params.range;

        if symbols.len() < 2 {
            return Err(MarketError::Other(
                "Comparison requires at least 2 symbols".to_string(),
            ));
        }
        if symbols.len() > MAX_SYMBOLS {
            return Err(MarketError::Other(format!(
                "Comparison supports at most {MAX_SYMBOLS} symbols"
            )));
        }

        let cache_key = CacheKey::new(
            symbols.join(","),
            "compare",
            json!({ "range": &range }),
        );

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                // Fan out one snapshot per symbol
                let futures: Vec<_> = symbols
                    .iter()
                    .map(|s| self.snapshot(s, &range))
                    .collect();
                let snapshots = futures::future::join_all(futures).await;

                let mut entries = Vec::new();
                for (symbol, snapshot) in symbols.iter().zip(snapshots) {
                    match snapshot {
                        Ok(entry) => entries.push(entry),
                        Err(e) => entries.push(json!({
                            "symbol": symbol,
                            "error": e.to_string(),
                        })),
                    }
                }

                Ok::<_, MarketError>(build_report(&symbols, &range, entries))
            })
            .await?;

        Ok(result)
    }

    /// Quote plus period performance for one symbol
    async fn snapshot(&self, symbol: &str, range: &str) -> Result<Value> {
        let quote = with_retry(self.retry, || self.yahoo.get_quote(symbol)).await?;
        let history =
            with_retry(self.retry, || self.yahoo.get_historical_range(symbol, range)).await?;

        let mut entry = json!({
            "symbol": symbol,
            "close": quote.close,
            "volume": quote.volume,
            "as_of": quote.timestamp.to_rfc3339(),
        });

        if let (Some(first), Some(last)) = (history.first(), history.last()) {
            if first.close != 0.0 {
                entry["period_change_percent"] =
                    json!((last.close - first.close) / first.close * 100.0);
            }
            entry["period_high"] = json!(
                history
                    .iter()
                    .map(|q| q.high)
                    .fold(f64::NEG_INFINITY, f64::max)
            );
            entry["period_low"] =
                json!(history.iter().map(|q| q.low).fold(f64::INFINITY, f64::min));
        }

        Ok(entry)
    }
}

/// Assemble the comparison report with best/worst performers
fn build_report(symbols: &[String], range: &str, entries: Vec<Value>) -> Value {
    let mut best: Option<(String, f64)> = None;
    let mut worst: Option<(String, f64)> = None;

    for entry in &entries {
        let (Some(symbol), Some(change)) = (
            entry["symbol"].as_str(),
            entry["period_change_percent"].as_f64(),
        ) else {
            continue;
        };

        if best.as_ref().is_none_or(|(_, b)| change > *b) {
            best = Some((symbol.to_string(), change));
        }
        if worst.as_ref().is_none_or(|(_, w)| change < *w) {
            worst = Some((symbol.to_string(), change));
        }
    }

    let mut report = json!({
        "symbols": symbols,
        "range": range,
        "stocks": entries,
    });

    if let Some((symbol, change)) = best {
        report["best_performer"] = json!({ "symbol": symbol, "change_percent": change });
    }
    if let Some((symbol, change)) = worst {
        report["worst_performer"] = json!({ "symbol": symbol, "change_percent": change });
    }

    report
}

#[async_trait]
impl Tool for CompareStocksTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: CompareParams = serde_json::from_value(params)
            .map_err(|e| finie_core::Error::Processing(format!("Invalid parameters: {e}")))?;

        Ok(self.fetch_comparison(params).await?)
    }

    fn name(&self) -> &'static str {
        "compare_stocks"
    }

    fn description(&self) -> &'static str {
        "Compare 2-5 stocks side by side: latest close, volume, and relative \
         performance (change, high, low) over a shared time range."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbols": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Ticker symbols to compare (2-5)",
                    "minItems": 2,
                    "maxItems": MAX_SYMBOLS
                },
                "range": {
                    "type": "string",
                    "description": "Time range for relative performance",
                    "enum": ["5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "ytd"],
                    "default": "1mo"
                }
            },
            "required": ["symbols"]
        })
    }
}
