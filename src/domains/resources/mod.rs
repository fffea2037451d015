//! Resources domain module.
//!
//! This module handles all resource-related functionality for the MCP server.
//! Resources are cached API payloads keyed by `nasa://` and `jpl://` URIs,
//! registered by tool handlers as they run, plus URI templates that describe
//! parameterized resources clients can request on demand.
//!
//! ## Architecture
//!
//! - `registry.rs` - Process-wide resource store with change notifications
//! - `templates.rs` - URI template parser, catalog, and generators
//! - `service.rs` - Resource service for listing and reading
//! - `error.rs` - Resource-specific error types

mod error;
mod registry;
mod service;
pub mod templates;

pub use error::ResourceError;
pub use registry::{ResourceContent, ResourceRegistry, StoredResource};
pub use service::ResourceService;
pub use templates::UriTemplate;
