//! Tools domain module.
//!
//! Tools are the callable operations exposed to MCP clients; each one wraps a
//! single upstream space-agency endpoint.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `context.rs` - Shared state (config, HTTP gateway, resource registry)
//! - `router.rs` - ToolRouter builder for the stdio transport
//! - `registry.rs` - Explicit name-to-handler table and HTTP dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file under `definitions/nasa/` or `definitions/jpl/`
//! 2. Implement `ToolDefinition` (params, NAME, DESCRIPTION, execute)
//! 3. Export it in the domain's `mod.rs`
//! 4. Add a route in `router.rs` using `route_for()`
//! 5. Add the dispatch arm in `registry.rs`

pub mod context;
pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use context::ToolContext;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
