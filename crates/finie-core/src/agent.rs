//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Trait implemented by anything that can answer a user question
///
/// Input and output are plain strings on purpose: the conversational surface
/// of the assistant is text in, text out. Concrete implementations decide how
/// much machinery (LLM calls, tool use, memory) sits behind that.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process one user input and produce a response
    async fn process(&mut self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
