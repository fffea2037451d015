//! Tool registry - central registration and dispatch for all tools.
//!
//! The registry is an explicit table: every tool is named here once, and
//! dispatch is a match over the same list the metadata comes from. A tool
//! missing from either place is a compile-visible gap, not a runtime
//! surprise.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Tool};
use serde_json::{Value, json};
use tracing::warn;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{ToolDefinition, dispatch, error_result, to_tool};
use crate::domains::tools::definitions::jpl::{CadTool, FireballTool, SbdbTool, ScoutTool};
use crate::domains::tools::definitions::nasa::{
    ApodTool, CmrTool, DonkiTool, EonetTool, EpicTool, ExoplanetTool, FirmsTool, GibsTool,
    ImagesTool, MarsRoverTool, NeoTool, PowerTool,
};

/// Tool registry - lists all available tools and dispatches calls by name.
pub struct ToolRegistry {
    context: Arc<ToolContext>,
}

impl ToolRegistry {
    /// Create a new tool registry over a shared tool context.
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }

    /// All tool names, in `domain/endpoint` form.
    pub fn tool_names() -> Vec<&'static str> {
        vec![
            ApodTool::NAME,
            NeoTool::NAME,
            EpicTool::NAME,
            GibsTool::NAME,
            CmrTool::NAME,
            FirmsTool::NAME,
            ImagesTool::NAME,
            ExoplanetTool::NAME,
            DonkiTool::NAME,
            MarsRoverTool::NAME,
            EonetTool::NAME,
            PowerTool::NAME,
            SbdbTool::NAME,
            FireballTool::NAME,
            ScoutTool::NAME,
            CadTool::NAME,
        ]
    }

    /// All tools as Tool models (metadata).
    ///
    /// Single source of truth for tool metadata; both transports use it.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            to_tool::<ApodTool>(),
            to_tool::<NeoTool>(),
            to_tool::<EpicTool>(),
            to_tool::<GibsTool>(),
            to_tool::<CmrTool>(),
            to_tool::<FirmsTool>(),
            to_tool::<ImagesTool>(),
            to_tool::<ExoplanetTool>(),
            to_tool::<DonkiTool>(),
            to_tool::<MarsRoverTool>(),
            to_tool::<EonetTool>(),
            to_tool::<PowerTool>(),
            to_tool::<SbdbTool>(),
            to_tool::<FireballTool>(),
            to_tool::<ScoutTool>(),
            to_tool::<CadTool>(),
        ]
    }

    /// Catalog grouped by domain, for the `tools/manifest` listing.
    pub fn manifest() -> Value {
        let mut domains = serde_json::Map::new();
        for tool in Self::get_all_tools() {
            let name = tool.name.as_ref();
            let domain = name.split('/').next().unwrap_or(name);
            let entry = json!({
                "name": name,
                "description": tool.description.as_deref().unwrap_or_default(),
            });
            domains
                .entry(domain.to_string())
                .or_insert_with(|| Value::Array(Vec::new()))
                .as_array_mut()
                .map(|tools| tools.push(entry));
        }
        json!({ "domains": domains, "total": Self::tool_names().len() })
    }

    /// Dispatch a tool call by name.
    ///
    /// Unknown names come back as an error envelope, never a panic or a
    /// protocol-level error.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        let context = &self.context;
        match name {
            ApodTool::NAME => dispatch::<ApodTool>(context, arguments).await,
            NeoTool::NAME => dispatch::<NeoTool>(context, arguments).await,
            EpicTool::NAME => dispatch::<EpicTool>(context, arguments).await,
            GibsTool::NAME => dispatch::<GibsTool>(context, arguments).await,
            CmrTool::NAME => dispatch::<CmrTool>(context, arguments).await,
            FirmsTool::NAME => dispatch::<FirmsTool>(context, arguments).await,
            ImagesTool::NAME => dispatch::<ImagesTool>(context, arguments).await,
            ExoplanetTool::NAME => dispatch::<ExoplanetTool>(context, arguments).await,
            DonkiTool::NAME => dispatch::<DonkiTool>(context, arguments).await,
            MarsRoverTool::NAME => dispatch::<MarsRoverTool>(context, arguments).await,
            EonetTool::NAME => dispatch::<EonetTool>(context, arguments).await,
            PowerTool::NAME => dispatch::<PowerTool>(context, arguments).await,
            SbdbTool::NAME => dispatch::<SbdbTool>(context, arguments).await,
            FireballTool::NAME => dispatch::<FireballTool>(context, arguments).await,
            ScoutTool::NAME => dispatch::<ScoutTool>(context, arguments).await,
            CadTool::NAME => dispatch::<CadTool>(context, arguments).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                error_result(&format!("Unknown tool: {name}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::test_context;
    use crate::domains::tools::definitions::common::result_text;

    #[test]
    fn test_registry_tool_names() {
        let names = ToolRegistry::tool_names();
        assert_eq!(names.len(), 16);
        assert!(names.contains(&"nasa/apod"));
        assert!(names.contains(&"nasa/neo"));
        assert!(names.contains(&"nasa/epic"));
        assert!(names.contains(&"nasa/gibs"));
        assert!(names.contains(&"nasa/cmr"));
        assert!(names.contains(&"nasa/firms"));
        assert!(names.contains(&"nasa/images"));
        assert!(names.contains(&"nasa/exoplanet"));
        assert!(names.contains(&"nasa/donki"));
        assert!(names.contains(&"nasa/mars-rover"));
        assert!(names.contains(&"nasa/eonet"));
        assert!(names.contains(&"nasa/power"));
        assert!(names.contains(&"jpl/sbdb"));
        assert!(names.contains(&"jpl/fireball"));
        assert!(names.contains(&"jpl/scout"));
        assert!(names.contains(&"jpl/cad"));
    }

    #[test]
    fn test_metadata_matches_names() {
        let names = ToolRegistry::tool_names();
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), names.len());
        for tool in &tools {
            assert!(names.contains(&tool.name.as_ref()));
        }
    }

    #[test]
    fn test_manifest_groups_by_domain() {
        let manifest = ToolRegistry::manifest();
        assert_eq!(manifest["total"], 16);
        assert_eq!(manifest["domains"]["nasa"].as_array().unwrap().len(), 12);
        assert_eq!(manifest["domains"]["jpl"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_error_envelope() {
        let registry = ToolRegistry::new(test_context());
        let result = registry.call_tool("bogus/thing", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Unknown tool: bogus/thing");
    }

    #[tokio::test]
    async fn test_call_name_without_slash_is_error_envelope() {
        let registry = ToolRegistry::new(test_context());
        let result = registry.call_tool("apod", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Unknown tool: apod");
    }

    #[tokio::test]
    async fn test_call_with_invalid_arguments_is_error_envelope() {
        let registry = ToolRegistry::new(test_context());
        let result = registry
            .call_tool("nasa/mars-rover", json!({"rover": "sojourner"}))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("nasa/mars-rover"));
    }
}
