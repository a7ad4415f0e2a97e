//! Market-data API clients

pub mod alpha_vantage;
pub mod finnhub;
pub mod yahoo;

pub use alpha_vantage::{AlphaVantageClient, CompanyOverview, QuarterlyEarnings};
pub use finnhub::{FinnhubClient, NewsArticle};
pub use yahoo::{Quote, YahooFinanceClient};

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy for market-data calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_retries: u32,
    /// Initial backoff, doubled after every failed attempt
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff duration before the given retry attempt (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base * 2_u32.pow(attempt)
    }
}

/// Run an operation with exponential backoff
///
/// Data providers rate-limit aggressively; transient failures usually clear
/// within a couple of seconds, so every error is treated as retryable up to
/// the attempt bound.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_retries.max(1);

    for attempt in 0..attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 < attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Market-data call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("retry loop always returns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_failures() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_base: Duration::from_millis(1),
        };
        let calls = AtomicU32::new(0);

        let result = with_retry(policy, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(MarketError::Api("transient".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let policy = RetryPolicy {
            max_retries: 2,
            backoff_base: Duration::from_millis(1),
        };
        let calls = AtomicU32::new(0);

        let result: Result<u32> = with_retry(policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(MarketError::Api("still down".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
