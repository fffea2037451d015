//! Tool-specific error types.

use thiserror::Error;

use crate::core::gateway::GatewayError;

/// Errors that can occur during tool execution.
///
/// These never escape the tool boundary: they are rendered into error
/// envelopes (`isError: true`) so a failing upstream call or a bad argument
/// can't take down the server.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The upstream API call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}
