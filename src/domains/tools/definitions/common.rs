//! Common plumbing shared across tool definitions.
//!
//! Every tool implements [`ToolDefinition`]; the generic helpers here turn a
//! definition into MCP tool metadata, a router route, and a registry dispatch
//! entry. Argument validation failures and upstream errors are rendered into
//! error envelopes, never surfaced as protocol errors or panics.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::core::gateway::GatewayError;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolError;

/// A single callable tool.
#[async_trait]
pub trait ToolDefinition: Send + Sync + 'static {
    /// Tool name in `domain/endpoint` form (e.g. `nasa/apod`).
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Parameter struct; its JSON schema is derived for clients.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Execute the tool. Must always return a well-formed result envelope.
    async fn execute(context: &ToolContext, params: Self::Params) -> CallToolResult;
}

/// Create the Tool model (metadata) for a definition.
pub fn to_tool<T: ToolDefinition>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(T::DESCRIPTION.into()),
        input_schema: cached_schema_for_type::<T::Params>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Create a ToolRoute for the rmcp router (STDIO transport).
pub fn route_for<T, S>(context: Arc<ToolContext>) -> ToolRoute<S>
where
    T: ToolDefinition,
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(to_tool::<T>(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let context = context.clone();
        async move { Ok(dispatch::<T>(&context, Value::Object(args)).await) }.boxed()
    })
}

/// Deserialize arguments and execute a definition, converting argument
/// failures into an error envelope.
pub async fn dispatch<T: ToolDefinition>(context: &ToolContext, arguments: Value) -> CallToolResult {
    match serde_json::from_value::<T::Params>(arguments) {
        Ok(params) => T::execute(context, params).await,
        Err(e) => {
            let err = ToolError::invalid_arguments(format!("{}: {}", T::NAME, e));
            error_result(&err.to_string())
        }
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Create a success result carrying a JSON document as pretty-printed text.
pub fn json_result(value: &Value) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => success_result(text),
        Err(e) => error_result(&format!("Failed to serialize result: {e}")),
    }
}

/// Render an upstream gateway failure as an error envelope.
pub fn gateway_error(err: GatewayError) -> CallToolResult {
    error_result(&ToolError::from(err).to_string())
}

/// Append a query parameter when the value is present.
pub fn push_param(
    query: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<impl ToString>,
) {
    if let Some(v) = value {
        query.push((key, v.to_string()));
    }
}

/// Today's date in the YYYY-MM-DD form the upstream APIs expect.
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Extract the single text payload from a result envelope (test helper).
#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> String {
    use rmcp::model::RawContent;
    result
        .content
        .first()
        .and_then(|c| match &c.raw {
            RawContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_sets_flag() {
        let result = error_result("boom");
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("boom"));
    }

    #[test]
    fn test_success_result_not_error() {
        let result = success_result("ok".to_string());
        assert_ne!(result.is_error, Some(true));
    }

    #[test]
    fn test_json_result_pretty_prints() {
        let result = json_result(&serde_json::json!({"a": 1}));
        let text = result_text(&result);
        assert!(text.contains("\"a\": 1"));
    }

    #[test]
    fn test_push_param_skips_none() {
        let mut query: Vec<(&'static str, String)> = Vec::new();
        push_param(&mut query, "present", Some("x"));
        push_param(&mut query, "absent", None::<String>);
        assert_eq!(query, vec![("present", "x".to_string())]);
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(date.as_bytes()[4], b'-');
        assert_eq!(date.as_bytes()[7], b'-');
    }

    #[test]
    fn test_gateway_error_envelope_mentions_key() {
        let result = gateway_error(GatewayError::MissingApiKey);
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("NASA_API_KEY"));
    }
}
