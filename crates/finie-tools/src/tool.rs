//! Tool trait definition

use async_trait::async_trait;
use finie_core::Result;
use serde_json::Value;

/// Trait for tools the model can invoke during its reasoning loop
///
/// Each tool declares a unique name, a description the model uses to decide
/// when to call it, and a JSON-Schema input contract.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// `params` is the JSON object the model produced for this call; it is
    /// expected to match [`Tool::input_schema`].
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a [`crate::ToolRegistry`].
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;
}
