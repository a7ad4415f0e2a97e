//! Agent loop for Finie
//!
//! The [`AgentExecutor`] implements the reasoning loop: call the LLM with
//! the conversation and available tools, execute whatever tools the model
//! requests, feed the results back, and repeat until the model produces a
//! final answer (or the iteration bound is hit).

pub mod executor;

pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};
