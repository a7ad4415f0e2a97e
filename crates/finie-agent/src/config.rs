//! Configuration for the Finie agent

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Finie agent and its market-data tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinieConfig {
    /// LLM model identifier
    pub model: String,

    /// Sampling temperature for the LLM
    pub temperature: f32,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Maximum LLM round-trips per question
    pub max_iterations: usize,

    /// Maximum conversation turns kept in memory
    pub max_history: usize,

    /// Cache TTL for real-time data (quotes, prices)
    pub cache_ttl_realtime: Duration,

    /// Cache TTL for fundamental data
    pub cache_ttl_fundamental: Duration,

    /// Cache TTL for news data
    pub cache_ttl_news: Duration,

    /// Maximum number of retries for market-data API calls
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Alpha Vantage API key (fundamentals and earnings)
    pub alpha_vantage_api_key: Option<String>,

    /// Finnhub API key (company news)
    pub finnhub_api_key: Option<String>,
}

impl Default for FinieConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 4096,
            max_iterations: 10,
            max_history: 50,
            cache_ttl_realtime: Duration::from_secs(60), // 1 minute
            cache_ttl_fundamental: Duration::from_secs(3600), // 1 hour
            cache_ttl_news: Duration::from_secs(300),    // 5 minutes
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            alpha_vantage_api_key: None,
            finnhub_api_key: None,
        }
    }
}

impl FinieConfig {
    /// Create a new configuration builder
    pub fn builder() -> FinieConfigBuilder {
        FinieConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(MarketError::Config("model must not be empty".to_string()));
        }

        if self.max_iterations == 0 {
            return Err(MarketError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(MarketError::Config(format!(
                "temperature {} outside supported range 0.0..=2.0",
                self.temperature
            )));
        }

        Ok(())
    }

    /// Get retry backoff duration for attempt number
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff_base * 2_u32.pow(attempt)
    }
}

/// Builder for FinieConfig
#[derive(Debug, Default)]
pub struct FinieConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    max_iterations: Option<usize>,
    max_history: Option<usize>,
    cache_ttl_realtime: Option<Duration>,
    cache_ttl_fundamental: Option<Duration>,
    cache_ttl_news: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    alpha_vantage_api_key: Option<String>,
    finnhub_api_key: Option<String>,
}

impl FinieConfigBuilder {
    /// Set the LLM model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set maximum LLM round-trips per question
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Set maximum conversation turns kept in memory
    pub fn max_history(mut self, max_history: usize) -> Self {
        self.max_history = Some(max_history);
        self
    }

    /// Set cache TTL for real-time data
    pub fn cache_ttl_realtime(mut self, duration: Duration) -> Self {
        self.cache_ttl_realtime = Some(duration);
        self
    }

    /// Set cache TTL for fundamental data
    pub fn cache_ttl_fundamental(mut self, duration: Duration) -> Self {
        self.cache_ttl_fundamental = Some(duration);
        self
    }

    /// Set cache TTL for news data
    pub fn cache_ttl_news(mut self, duration: Duration) -> Self {
        self.cache_ttl_news = Some(duration);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Load the model name from `OPENAI_MODEL` if set
    pub fn from_env_model(mut self) -> Self {
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.model = Some(model);
        }
        self
    }

    /// Load optional data-provider API keys from the environment
    ///
    /// Reads `ALPHA_VANTAGE_API_KEY` and `FINNHUB_API_KEY`; missing keys
    /// leave the corresponding tools in degraded mode rather than failing.
    pub fn with_env_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            self.finnhub_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FinieConfig> {
        let defaults = FinieConfig::default();

        let config = FinieConfig {
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            max_history: self.max_history.unwrap_or(defaults.max_history),
            cache_ttl_realtime: self.cache_ttl_realtime.unwrap_or(defaults.cache_ttl_realtime),
            cache_ttl_fundamental: self
                .cache_ttl_fundamental
                .unwrap_or(defaults.cache_ttl_fundamental),
            cache_ttl_news: self.cache_ttl_news.unwrap_or(defaults.cache_ttl_news),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            finnhub_api_key: self.finnhub_api_key,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FinieConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = FinieConfig::builder()
            .model("gpt-4o")
            .temperature(0.0)
            .max_iterations(5)
            .build()
            .unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_iterations, 5);
    }

    #[test]
    fn test_validation_rejects_zero_iterations() {
        let result = FinieConfig::builder().max_iterations(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_temperature() {
        let result = FinieConfig::builder().temperature(3.5).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_retry_backoff() {
        let config = FinieConfig::default();
        assert_eq!(config.retry_backoff(0), Duration::from_secs(1));
        assert_eq!(config.retry_backoff(1), Duration::from_secs(2));
        assert_eq!(config.retry_backoff(2), Duration::from_secs(4));
    }
}
