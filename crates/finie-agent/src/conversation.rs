//! Conversation memory for multi-turn interactions
//!
//! Tracks user questions and final assistant answers (intermediate tool
//! traffic is not recorded), resolves follow-up references like "this
//! stock" against the last discussed ticker, and converts the transcript
//! into LLM messages for the agent loop.

use chrono::{DateTime, Utc};
use finie_llm::Message;
use std::collections::VecDeque;

/// Default maximum number of conversation turns kept in memory
const DEFAULT_MAX_HISTORY: usize = 50;

/// Words that look like tickers but never are
const SYMBOL_STOPLIST: &[&str] = &[
    "A", "I", "AI", "CEO", "EPS", "ETF", "IPO", "PE", "Q", "ROE", "SEC", "UP", "US", "USD", "VS",
    "YOY",
];

/// A single turn in the conversation
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    /// User's input
    pub user_input: String,
    /// Assistant's response
    pub assistant_response: String,
    /// Stock symbols mentioned in this turn
    pub symbols: Vec<String>,
    /// Timestamp of the turn
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a new conversation turn
    pub fn new(user_input: String, assistant_response: String, symbols: Vec<String>) -> Self {
        Self {
            user_input,
            assistant_response,
            symbols,
            timestamp: Utc::now(),
        }
    }
}

/// Manager for conversation history and ticker context
#[derive(Debug)]
pub struct ConversationManager {
    history: VecDeque<ConversationTurn>,
    current_symbol: Option<String>,
    max_history: usize,
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationManager {
    /// Create a new conversation manager
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    /// Create with a custom history bound
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(max_history),
            current_symbol: None,
            max_history,
        }
    }

    /// Add a completed turn to the conversation
    pub fn add_turn(&mut self, user_input: String, response: String, symbols: Vec<String>) {
        if let Some(symbol) = symbols.first() {
            self.current_symbol = Some(symbol.clone());
        }

        self.history
            .push_back(ConversationTurn::new(user_input, response, symbols));

        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// Get the ticker currently under discussion
    pub fn current_symbol(&self) -> Option<&str> {
        self.current_symbol.as_deref()
    }

    /// Set the ticker currently under discussion
    pub fn set_current_symbol(&mut self, symbol: impl Into<String>) {
        self.current_symbol = Some(symbol.into());
    }

    /// Get the conversation history
    pub fn history(&self) -> &VecDeque<ConversationTurn> {
        &self.history
    }

    /// Convert the transcript into LLM messages, oldest first
    pub fn as_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() * 2);
        for turn in &self.history {
            messages.push(Message::user(turn.user_input.clone()));
            messages.push(Message::assistant(turn.assistant_response.clone()));
        }
        messages
    }

    /// Check if a query appears to reference previous context
    pub fn is_follow_up(&self, query: &str) -> bool {
        let query_lower = query.to_lowercase();

        let follow_up_indicators = [
            "it",
            "this",
            "that",
            "the stock",
            "the company",
            "same",
            "also",
            "continue",
            "more",
            "what about",
            "how about",
            "and the",
        ];

        follow_up_indicators
            .iter()
            .any(|indicator| query_lower.contains(indicator))
    }

    /// Resolve ticker references in a query using conversation context
    ///
    /// "what about this stock's earnings?" after discussing AAPL becomes a
    /// query that explicitly names AAPL, so the model does not have to guess.
    pub fn resolve_references(&self, query: &str) -> String {
        let Some(symbol) = &self.current_symbol else {
            return query.to_string();
        };

        let patterns = ["this stock", "that stock", "the stock", "the company"];

        let mut resolved = query.to_string();
        for pattern in patterns {
            resolved = resolved.replace(pattern, symbol);
        }

        let has_symbol = !extract_symbols(&resolved).is_empty();
        if !has_symbol && self.is_follow_up(query) {
            resolved = format!("{symbol}: {resolved}");
        }

        resolved
    }

    /// Clear conversation history and context
    pub fn clear(&mut self) {
        self.history.clear();
        self.current_symbol = None;
    }

    /// Get the number of turns in history
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Extract candidate ticker symbols from a query
///
/// US tickers are 1-5 uppercase letters; a stoplist filters the usual
/// finance acronyms and pronouns that match the same shape.
pub fn extract_symbols(query: &str) -> Vec<String> {
    let mut symbols = Vec::new();

    for word in query.split_whitespace() {
        let clean_word = word.trim_matches(|c: char| !c.is_alphanumeric());

        if !clean_word.is_empty()
            && clean_word.len() <= 5
            && clean_word.chars().all(|c| c.is_ascii_uppercase())
            && !SYMBOL_STOPLIST.contains(&clean_word)
        {
            symbols.push(clean_word.to_string());
        }
    }

    symbols.sort();
    symbols.dedup();
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_turn_tracks_symbol() {
        let mut manager = ConversationManager::new();

        manager.add_turn(
            "Analyze AAPL".to_string(),
            "Apple analysis...".to_string(),
            vec!["AAPL".to_string()],
        );

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.current_symbol(), Some("AAPL"));
    }

    #[test]
    fn test_follow_up_detection() {
        let mut manager = ConversationManager::new();
        manager.add_turn(
            "Analyze AAPL".to_string(),
            "Analysis...".to_string(),
            vec!["AAPL".to_string()],
        );

        assert!(manager.is_follow_up("What about this stock's fundamentals?"));
        assert!(manager.is_follow_up("Is it a buy?"));
        assert!(!manager.is_follow_up("Analyze GOOGL"));
    }

    #[test]
    fn test_reference_resolution() {
        let mut manager = ConversationManager::new();
        manager.add_turn(
            "Analyze AAPL".to_string(),
            "Analysis...".to_string(),
            vec!["AAPL".to_string()],
        );

        let resolved = manager.resolve_references("What is this stock's P/E?");
        assert!(resolved.contains("AAPL"));

        // Follow-up with no symbol at all gets the current one prepended
        let resolved = manager.resolve_references("Is it overvalued?");
        assert!(resolved.starts_with("AAPL:"));
    }

    #[test]
    fn test_resolution_without_context_is_identity() {
        let manager = ConversationManager::new();
        let query = "What is this stock's P/E?";
        assert_eq!(manager.resolve_references(query), query);
    }

    #[test]
    fn test_as_messages_order() {
        let mut manager = ConversationManager::new();
        manager.add_turn("q1".to_string(), "a1".to_string(), vec![]);
        manager.add_turn("q2".to_string(), "a2".to_string(), vec![]);

        let messages = manager.as_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].text(), Some("q1"));
        assert_eq!(messages[1].text(), Some("a1"));
        assert_eq!(messages[3].text(), Some("a2"));
    }

    #[test]
    fn test_clear() {
        let mut manager = ConversationManager::new();
        manager.add_turn(
            "Test".to_string(),
            "Response".to_string(),
            vec!["TSLA".to_string()],
        );

        manager.clear();
        assert!(manager.is_empty());
        assert!(manager.current_symbol().is_none());
    }

    #[test]
    fn test_history_limit() {
        let mut manager = ConversationManager::with_max_history(3);

        for i in 0..5 {
            manager.add_turn(format!("Query {i}"), format!("Response {i}"), vec![]);
        }

        assert_eq!(manager.len(), 3);
        // Oldest turns are evicted first
        assert_eq!(manager.history()[0].user_input, "Query 2");
    }

    #[test]
    fn test_extract_symbols() {
        let symbols = extract_symbols("Compare AAPL and MSFT on EPS, is NVDA up?");
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn test_extract_symbols_stoplist() {
        let symbols = extract_symbols("I think the CEO likes AI and USD");
        assert!(symbols.is_empty());
    }
}
