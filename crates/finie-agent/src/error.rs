//! Error types for market-data operations

use thiserror::Error;

/// Market-data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// API request failed
    #[error("API error: {0}")]
    Api(String),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Rate limit exceeded for a provider
    #[error("Rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Command parsing error
    #[error("Command error: {0}")]
    Command(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for market-data operations
pub type Result<T> = std::result::Result<T, MarketError>;

impl From<MarketError> for finie_core::Error {
    fn from(err: MarketError) -> Self {
        finie_core::Error::Processing(err.to_string())
    }
}

impl From<finie_core::Error> for MarketError {
    fn from(err: finie_core::Error) -> Self {
        MarketError::Other(err.to_string())
    }
}
