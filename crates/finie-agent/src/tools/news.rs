//! Tool for fetching company news and naive sentiment

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use finie_core::Result as CoreResult;
use finie_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::{FinnhubClient, NewsArticle, RetryPolicy, with_retry};
use crate::cache::{CacheKey, MarketCache};
use crate::config::FinieConfig;
use crate::error::{MarketError, Result};

/// Tool for fetching recent company news headlines
pub struct CompanyNewsTool {
    finnhub: Option<Arc<FinnhubClient>>,
    cache: MarketCache,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct NewsParams {
    symbol: String,
    #[serde(default = "default_days_back")]
    days_back: i64,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_days_back() -> i64 {
    7
}

fn default_limit() -> usize {
    10
}

impl CompanyNewsTool {
    /// Create a new company news tool
    pub fn new(config: &FinieConfig, cache: MarketCache) -> Self {
        let finnhub = config
            .finnhub_api_key
            .as_ref()
            .map(|key| Arc::new(FinnhubClient::new(key.clone(), 60)));

        Self {
            finnhub,
            cache,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base: config.retry_backoff_base,
            },
        }
    }

    async fn fetch_news(&self, params: NewsParams) -> Result<Value> {
        let symbol = params.symbol.to_uppercase();
        let days_back = params.days_back.clamp(1, 30);
        let limit = params.limit.clamp(1, 50);

        let Some(client) = &self.finnhub else {
            return Err(MarketError::Config(
                "Finnhub API key required for company news (set FINNHUB_API_KEY)".to_string(),
            ));
        };

        let cache_key = CacheKey::new(
            &symbol,
            "news",
            json!({ "days_back": days_back, "limit": limit }),
        );

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                let to = Utc::now();
                let from = (to - ChronoDuration::days(days_back))
                    .format("%Y-%m-%d")
                    .to_string();
                let to = to.format("%Y-%m-%d").to_string();

                let articles = with_retry(self.retry, || {
                    client.get_company_news(&symbol, &from, &to)
                })
                .await?;

                if articles.is_empty() {
                    return Err(MarketError::DataUnavailable {
                        symbol: symbol.clone(),
                        reason: format!("no news in the last {days_back} days"),
                    });
                }

                Ok::<_, MarketError>(summarize_news(&symbol, &articles, limit))
            })
            .await?;

        Ok(result)
    }
}

/// Reshape articles into headline entries plus an aggregate sentiment tally
fn summarize_news(symbol: &str, articles: &[NewsArticle], limit: usize) -> Value {
    let mut positive = 0usize;
    let mut negative = 0usize;
    let mut neutral = 0usize;

    let entries: Vec<_> = articles
        .iter()
        .take(limit)
        .map(|a| {
            let sentiment = classify_headline(&a.headline);
            match sentiment {
                "positive" => positive += 1,
                "negative" => negative += 1,
                _ => neutral += 1,
            }

            let published = chrono::DateTime::from_timestamp(a.datetime, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();

            json!({
                "headline": a.headline,
                "source": a.source,
                "published_at": published,
                "summary": a.summary,
                "sentiment": sentiment,
                "url": a.url,
            })
        })
        .collect();

    let overall = if positive > negative {
        "positive"
    } else if negative > positive {
        "negative"
    } else {
        "neutral"
    };

    json!({
        "symbol": symbol,
        "news_count": entries.len(),
        "articles": entries,
        "overall_sentiment": overall,
        "sentiment_breakdown": {
            "positive": positive,
            "negative": negative,
            "neutral": neutral,
        },
    })
}

/// Keyword-tally sentiment for a headline
///
/// Shallow on purpose: the model sees every headline and makes the real
/// sentiment call; the tally only gives it a quick aggregate.
fn classify_headline(headline: &str) -> &'static str {
    const POSITIVE: &[&str] = &[
        "beat", "beats", "surge", "surges", "soar", "soars", "record", "growth", "upgrade",
        "rally", "gain", "gains", "jumps", "strong", "tops",
    ];
    const NEGATIVE: &[&str] = &[
        "miss", "misses", "fall", "falls", "drop", "drops", "plunge", "plunges", "lawsuit",
        "downgrade", "cut", "cuts", "weak", "slump", "recall", "probe",
    ];

    let lower = headline.to_lowercase();
    let pos = POSITIVE.iter().filter(|w| lower.contains(*w)).count();
    let neg = NEGATIVE.iter().filter(|w| lower.contains(*w)).count();

    if pos > neg {
        "positive"
    } else if neg > pos {
        "negative"
    } else {
        "neutral"
    }
}

#[async_trait]
impl Tool for CompanyNewsTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: NewsParams = serde_json::from_value(params)
            .map_err(|e| finie_core::Error::Processing(format!("Invalid parameters: {e}")))?;

        Ok(self.fetch_news(params).await?)
    }

    fn name(&self) -> &'static str {
        "company_news"
    }

    fn description(&self) -> &'static str {
        "Fetch recent news headlines for a company with a rough sentiment tally. \
         Use days_back to match the timeframe of the question. \
         Requires a Finnhub API key."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'AAPL', 'GOOGL')"
                },
                "days_back": {
                    "type": "integer",
                    "description": "How many days to look back for news (1-30)",
                    "default": 7
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of articles to return (1-50)",
                    "default": 10
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

    fn article(headline: &str) -> NewsArticle {
        NewsArticle {
            datetime: 1_722_988_800,
            headline: headline.to_string(),
            source: "Reuters".to_string(),
            summary: "summary".to_string(),
            url: "https://example.com".to_string(),
            related: "AAPL".to_string(),
        }
    }

    #[test]
    fn test_classify_headline() {
        assert_eq!(classify_headline("Apple beats estimates"), "positive");
        assert_eq!(classify_headline("Shares drop after probe"), "negative");
        assert_eq!(classify_headline("Apple announces new iPhone"), "neutral");
    }

    #[test]
    fn test_summarize_news_tally() {
        let articles = vec![
            article("Apple beats on earnings"),
            article("Apple surges to record high"),
            article("Supplier shares drop"),
        ];

        let summary = summarize_news("AAPL", &articles, 10);
        assert_eq!(summary["news_count"], 3);
        assert_eq!(summary["overall_sentiment"], "positive");
        assert_eq!(summary["sentiment_breakdown"]["positive"], 2);
        assert_eq!(summary["sentiment_breakdown"]["negative"], 1);
    }

    #[test]
    fn test_summarize_news_respects_limit() {
        let articles: Vec<_> = (0..20).map(|i| article(&format!("Item {i}"))).collect();
        let summary = summarize_news("AAPL", &articles, 5);
        assert_eq!(summary["news_count"], 5);
        assert_eq!(summary["articles"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_tool_metadata() {
        let config = FinieConfig::default();
        let cache = MarketCache::new(Duration::from_secs(300));
        let tool = CompanyNewsTool::new(&config, cache);

        assert_eq!(tool.name(), "company_news");
        assert!(!tool.description().is_empty());
    }

    #[tokio::test]
    async fn test_execute_without_api_key() {
        let config = FinieConfig::default();
        let cache = MarketCache::new(Duration::from_secs(300));
        let tool = CompanyNewsTool::new(&config, cache);

        let result = tool.execute(json!({"symbol": "AAPL"})).await;
        assert!(result.is_err());
    }
}
