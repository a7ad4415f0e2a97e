//! Core abstractions for Finie
//!
//! This crate defines the fundamental trait and types shared by every other
//! crate in the workspace: the [`Agent`] trait, the [`Context`] passed to it,
//! and the workspace-level [`Error`] type.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
