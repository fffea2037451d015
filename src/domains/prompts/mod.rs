//! Prompts domain module.
//!
//! This module handles all prompt-related functionality for the MCP server.
//! Prompts are guided entry points into the tool catalog: each one renders a
//! user message and names the tool that `prompts/execute` dispatches to.
//!
//! ## Architecture
//!
//! - `registry.rs` - Static prompt catalog with argument specs and renderers
//! - `service.rs` - Prompt service for listing, rendering, and tool resolution
//! - `error.rs` - Prompt-specific error types

mod error;
mod registry;
mod service;

pub use error::PromptError;
pub use registry::{ArgSpec, PromptSpec, all_prompts, prompt_names};
pub use service::PromptService;
