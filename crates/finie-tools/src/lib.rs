//! Tool framework for Finie
//!
//! Defines the [`Tool`] trait market-data tools implement and the
//! [`ToolRegistry`] the agent loop resolves tool calls against.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
