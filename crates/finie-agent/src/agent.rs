//! The Finie agent: tools, memory, and the reasoning loop wired together

use async_trait::async_trait;
use finie_core::Context;
use finie_llm::LlmProvider;
use finie_runtime::{AgentExecutor, ExecutorConfig};
use finie_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::CacheManager;
use crate::config::FinieConfig;
use crate::conversation::{ConversationManager, extract_symbols};
use crate::error::Result;
use crate::prompts;
use crate::tools::{
    CompanyNewsTool, CompareStocksTool, EarningsDataTool, FundamentalMetricsTool, StockPriceTool,
};

/// Finie - AI finance agent
///
/// Owns the tool registry, the per-data-class caches, the conversation
/// transcript, and the executor that drives the LLM. One instance is one
/// conversation.
pub struct FinieAgent {
    executor: AgentExecutor,
    conversation: ConversationManager,
    config: FinieConfig,
}

impl FinieAgent {
    /// Create a new agent with the given LLM provider and configuration
    pub fn new(provider: Arc<dyn LlmProvider>, config: FinieConfig) -> Result<Self> {
        config.validate()?;

        let caches = CacheManager::new(
            config.cache_ttl_realtime,
            config.cache_ttl_fundamental,
            config.cache_ttl_news,
        );

        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(StockPriceTool::new(
            &config,
            caches.realtime.clone(),
        )));
        registry.register(Arc::new(FundamentalMetricsTool::new(
            &config,
            caches.fundamental.clone(),
        )));
        registry.register(Arc::new(EarningsDataTool::new(
            &config,
            caches.fundamental.clone(),
        )));
        registry.register(Arc::new(CompanyNewsTool::new(&config, caches.news.clone())));
        registry.register(Arc::new(CompareStocksTool::new(
            &config,
            caches.realtime.clone(),
        )));

        info!(tool_count = registry.len(), model = %config.model, "Finie agent initialized");

        let executor = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(registry)
            .config(ExecutorConfig {
                max_iterations: config.max_iterations,
                model: config.model.clone(),
                system_prompt: Some(prompts::system_prompt().to_string()),
                max_tokens: config.max_tokens,
                temperature: Some(config.temperature),
            })
            .build()?;

        let conversation = ConversationManager::with_max_history(config.max_history);

        Ok(Self {
            executor,
            conversation,
            config,
        })
    }

    /// Ask the agent a question and get its final answer
    ///
    /// Follow-up references are resolved against the transcript before the
    /// loop runs; the question and the final answer are then recorded as a
    /// new turn.
    pub async fn query(&mut self, question: &str) -> Result<String> {
        let resolved = self.conversation.resolve_references(question);
        if resolved != question {
            debug!(original = %question, resolved = %resolved, "Resolved follow-up references");
        }

        let symbols = extract_symbols(&resolved);
        if let Some(symbol) = symbols.first() {
            self.conversation.set_current_symbol(symbol);
        }

        let history = self.conversation.as_messages();
        let answer = self.executor.run_with_history(resolved, history).await?;

        self.conversation
            .add_turn(question.to_string(), answer.clone(), symbols);

        Ok(answer)
    }

    /// Clear the conversation transcript
    pub fn clear_history(&mut self) {
        self.conversation.clear();
    }

    /// Get the conversation manager
    pub fn conversation(&self) -> &ConversationManager {
        &self.conversation
    }

    /// Get the agent configuration
    pub fn config(&self) -> &FinieConfig {
        &self.config
    }
}

#[async_trait]
impl finie_core::Agent for FinieAgent {
    async fn process(&mut self, input: String, context: &mut Context) -> finie_core::Result<String> {
        if let Some(session) = context.session_id() {
            debug!(session_id = %session, "Processing query");
        }
        Ok(self.query(&input).await?)
    }

    fn name(&self) -> &'static str {
        "finie"
    }
}
