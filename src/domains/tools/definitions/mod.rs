//! Tool definitions, grouped by upstream agency.
//!
//! Every tool implements [`common::ToolDefinition`]: a typed parameter
//! struct, a stable `domain/endpoint` name, and an execute body that calls
//! the upstream API and shapes the reply into a result envelope.

pub mod common;
pub mod jpl;
pub mod nasa;

pub use common::ToolDefinition;
