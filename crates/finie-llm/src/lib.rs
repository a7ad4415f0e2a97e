//! LLM provider layer for Finie
//!
//! Provider-neutral message and completion types, the [`LlmProvider`] trait,
//! and a concrete provider speaking the OpenAI chat-completions wire format
//! (including OpenAI-compatible local servers via a custom base URL).

pub mod completion;
pub mod error;
pub mod messages;
pub mod openai;
pub mod provider;
pub mod tools;

pub use completion::{
    CompletionRequest, CompletionRequestBuilder, CompletionResponse, StopReason, TokenUsage,
};
pub use error::{LlmError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::LlmProvider;
pub use tools::ToolDefinition;
