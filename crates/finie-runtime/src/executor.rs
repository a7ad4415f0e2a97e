//! Agent executor for running the reasoning loop
//!
//! The loop:
//! 1. Call the LLM with conversation history and available tools
//! 2. If the model requested tool calls, execute them and append the results
//! 3. Loop back until the model ends its turn or `max_iterations` is hit
//!
//! Tool failures do not abort the turn: they are fed back to the model as
//! error results so it can recover (retry with different input, pick another
//! tool, or explain the failure to the user).

use finie_core::Result;
use finie_llm::{CompletionRequest, ContentBlock, LlmProvider, Message, StopReason, ToolDefinition};
use finie_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of LLM round-trips per turn (prevents infinite loops)
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "gpt-4o-mini".to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: Some(0.3),
        }
    }
}

/// Executes the agent loop: LLM → tool calls → execution → loop back
pub struct AgentExecutor {
    provider: Arc<dyn LlmProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
        }
    }

    /// Create a builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Get the executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute the agent loop with a single user query
    pub async fn run(&self, user_message: String) -> Result<String> {
        self.run_with_history(user_message, Vec::new()).await
    }

    /// Execute the agent loop with prior conversation history
    ///
    /// `history` holds the previous user/assistant turns; the new user
    /// message is appended before the loop starts.
    pub async fn run_with_history(
        &self,
        user_message: String,
        history: Vec<Message>,
    ) -> Result<String> {
        let mut conversation = history;
        conversation.push(Message::user(user_message));

        let tools = self.build_tool_definitions();
        debug!(tool_count = tools.len(), "Available tools");

        for iteration in 1..=self.config.max_iterations {
            info!(
                iteration,
                max_iterations = self.config.max_iterations,
                model = %self.config.model,
                "Agent iteration"
            );

            let mut request_builder = CompletionRequest::builder(self.config.model.clone())
                .messages(conversation.clone())
                .max_tokens(self.config.max_tokens);

            if let Some(system) = &self.config.system_prompt {
                request_builder = request_builder.system(system.clone());
            }
            if let Some(temperature) = self.config.temperature {
                request_builder = request_builder.temperature(temperature);
            }
            if !tools.is_empty() {
                request_builder = request_builder.tools(tools.clone());
            }

            let response = self
                .provider
                .complete(request_builder.build())
                .await
                .map_err(|e| finie_core::Error::Processing(e.to_string()))?;

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            conversation.push(response.message.clone());

            match response.stop_reason {
                StopReason::EndTurn => {
                    let text = response.message.text().unwrap_or("No response").to_string();
                    info!(iteration, response_length = text.len(), "Agent completed");
                    return Ok(text);
                }

                StopReason::ToolUse => {
                    let tool_results = self.execute_tools(&response.message).await;

                    if tool_results.is_empty() {
                        warn!("No tool results despite tool_use stop reason");
                        return Ok("Tool execution produced no results".to_string());
                    }

                    conversation.extend(tool_results);
                }

                StopReason::MaxTokens => {
                    warn!("Hit max tokens in LLM response");
                    let text = response
                        .message
                        .text()
                        .unwrap_or("Response truncated due to token limit")
                        .to_string();
                    return Ok(text);
                }
            }
        }

        warn!(
            "Max iterations ({}) reached, stopping",
            self.config.max_iterations
        );
        Ok("I ran out of reasoning steps before reaching a final answer. \
            Try a narrower question."
            .to_string())
    }

    /// Build tool definitions from the registry
    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Execute the tool calls in an assistant message
    ///
    /// Every requested call yields exactly one result message; failures
    /// (including unknown tool names) become error results rather than
    /// aborting the turn.
    async fn execute_tools(&self, message: &Message) -> Vec<Message> {
        let mut results = Vec::new();

        for tool_use in message.tool_uses() {
            if let ContentBlock::ToolUse { id, name, input } = tool_use {
                info!(tool_name = %name, tool_id = %id, "Executing tool");
                debug!(input = %input, "Tool input");

                let Some(tool) = self.tool_registry.get(name) else {
                    warn!(tool_name = %name, "Requested tool is not registered");
                    results.push(Message::tool_error(
                        id.clone(),
                        format!("Error: unknown tool '{name}'"),
                    ));
                    continue;
                };

                let start = std::time::Instant::now();
                match tool.execute(input.clone()).await {
                    Ok(result) => {
                        let result_str =
                            serde_json::to_string(&result).unwrap_or_else(|_| result.to_string());
                        info!(
                            tool_name = %name,
                            duration_ms = start.elapsed().as_millis() as u64,
                            result_length = result_str.len(),
                            "Tool execution succeeded"
                        );
                        results.push(Message::tool_result(id.clone(), result_str));
                    }
                    Err(e) => {
                        warn!(
                            tool_name = %name,
                            duration_ms = start.elapsed().as_millis() as u64,
                            error = %e,
                            "Tool execution failed"
                        );
                        results.push(Message::tool_error(id.clone(), format!("Error: {e}")));
                    }
                }
            }
        }

        results
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| finie_core::Error::Configuration("Provider not set".to_string()))?;

        Ok(AgentExecutor::new(
            provider,
            self.tool_registry,
            self.config,
        ))
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
