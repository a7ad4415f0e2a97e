//! Error types for finie-core

use thiserror::Error;

/// Result type alias for finie-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent configuration is invalid or incomplete
    #[error("Agent configuration failed: {0}")]
    Configuration(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    Processing(String),
}
