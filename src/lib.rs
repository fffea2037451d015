//! NASA MCP Server Library
//!
//! This crate exposes NASA and JPL open data APIs as a Model Context
//! Protocol (MCP) server: tools wrap upstream endpoints, derived results are
//! cached as URI-addressed resources, and prompts guide common queries.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, the upstream API gateway, the
//!   main server handler, and the transport layer (stdio and HTTP/SSE)
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: One tool per upstream NASA/JPL endpoint
//!   - **resources**: Cached resources plus URI-template resolution
//!   - **prompts**: Prompt templates mapped to tools
//!
//! # Example
//!
//! ```rust,no_run
//! use nasa_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
