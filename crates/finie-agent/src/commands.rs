//! Command parsing for the interactive CLI

use crate::error::{MarketError, Result};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear conversation history
    Clear,
    /// Show recent conversation turns
    History,
    /// Show help
    Help,
    /// Exit the session
    Exit,
    /// Natural language query (not a command)
    Query { text: String },
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(MarketError::Command("Empty input".to_string()));
        }

        // Bare exit words work without the slash, like any chat REPL
        if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "q") {
            return Ok(Command::Exit);
        }

        if !input.starts_with('/') {
            return Ok(Command::Query {
                text: input.to_string(),
            });
        }

        let parts: Vec<&str> = input[1..].split_whitespace().collect();
        if parts.is_empty() {
            return Err(MarketError::Command("Empty command".to_string()));
        }

        match parts[0].to_lowercase().as_str() {
            "clear" | "cls" => Ok(Command::Clear),
            "history" | "hist" => Ok(Command::History),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            cmd => Err(MarketError::Command(format!("Unknown command: /{cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Finie - AI Finance Agent
========================

Ask questions in natural language:
  What is AAPL trading at?
  Why did Nvidia drop this week?
  Compare MSFT and GOOGL over the last 6 months

Commands:
  /history   Show recent conversation turns
  /clear     Clear conversation history
  /help      Show this help
  /exit      Exit (also: exit, quit, q)
"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_natural_language() {
        let cmd = Command::parse("What is the price of AAPL?").unwrap();
        assert_eq!(
            cmd,
            Command::Query {
                text: "What is the price of AAPL?".to_string()
            }
        );
    }

    #[test]
    fn test_parse_slash_commands() {
        assert_eq!(Command::parse("/clear").unwrap(), Command::Clear);
        assert_eq!(Command::parse("/cls").unwrap(), Command::Clear);
        assert_eq!(Command::parse("/history").unwrap(), Command::History);
        assert_eq!(Command::parse("/help").unwrap(), Command::Help);
        assert_eq!(Command::parse("/?").unwrap(), Command::Help);
        assert_eq!(Command::parse("/exit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_bare_exit_words() {
        assert_eq!(Command::parse("exit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("quit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("q").unwrap(), Command::Exit);
        assert_eq!(Command::parse("Quit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(Command::parse("/analyze AAPL").is_err());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("   ").is_err());
    }
}
