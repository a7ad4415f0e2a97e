//! Finie - an AI finance question-answering agent
//!
//! Finie answers natural-language market questions by letting an LLM
//! investigate with a small set of market-data tools:
//!
//! - Price lookups (Yahoo Finance, current and historical)
//! - Fundamental metrics (Alpha Vantage company overview)
//! - Earnings history with EPS surprises (Alpha Vantage)
//! - Company news with a rough sentiment tally (Finnhub)
//! - Side-by-side stock comparison
//!
//! Tool outputs are fetched fresh per question behind short-lived TTL
//! caches; the only state carried across questions is the conversation
//! transcript that gives the agent multi-turn memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use finie_agent::{FinieAgent, FinieConfig};
//! use finie_llm::OpenAiProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(OpenAiProvider::from_env()?);
//!     let config = FinieConfig::builder().with_env_keys().build()?;
//!
//!     let mut agent = FinieAgent::new(provider, config)?;
//!     let answer = agent.query("Why did NVDA move this week?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod prompts;
pub mod tools;

// Re-export main types for convenience
pub use agent::FinieAgent;
pub use commands::Command;
pub use config::FinieConfig;
pub use conversation::{ConversationManager, ConversationTurn};
pub use error::{MarketError, Result};
pub use tools::{
    CompanyNewsTool, CompareStocksTool, EarningsDataTool, FundamentalMetricsTool, StockPriceTool,
};
