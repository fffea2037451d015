//! MCP server implementation and lifecycle management.
//!
//! The server handler implements the MCP protocol by delegating to the
//! domain services: tools (upstream API wrappers), resources (registry plus
//! URI templates), and prompts (static catalog).
//!
//! ## Tool Architecture
//!
//! Tools live under `domains/tools/definitions/`, one file per upstream
//! endpoint. The stdio transport routes calls through the rmcp `ToolRouter`;
//! the HTTP transport dispatches through the explicit `ToolRegistry` table.
//! Both are built from the same definitions.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::{
    prompts::PromptService,
    resources::{ResourceRegistry, ResourceService},
    tools::{ToolContext, ToolRegistry, build_tool_router},
};

/// The main MCP server handler.
///
/// Implements the `ServerHandler` trait from rmcp and coordinates between
/// the domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared registry of cached resources.
    resource_registry: Arc<ResourceRegistry>,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Service for handling prompt-related requests.
    prompt_service: Arc<PromptService>,

    /// Explicit dispatch table, used by the HTTP transport.
    tool_registry: Arc<ToolRegistry>,

    /// Tool router for the stdio transport.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails only if the upstream HTTP client cannot be constructed.
    pub fn new(config: Config) -> crate::core::Result<Self> {
        let config = Arc::new(config);

        let resource_registry = Arc::new(ResourceRegistry::new());
        let context = Arc::new(ToolContext::new(config.clone(), resource_registry.clone())?);

        let resource_service = Arc::new(ResourceService::new(resource_registry.clone()));
        let prompt_service = Arc::new(PromptService::new());
        let tool_registry = Arc::new(ToolRegistry::new(context.clone()));

        Ok(Self {
            tool_router: build_tool_router::<Self>(context),
            config,
            resource_registry,
            resource_service,
            prompt_service,
            tool_registry,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the shared resource registry.
    ///
    /// Transports subscribe to its revision channel to emit
    /// `notifications/resources/list_changed`.
    pub fn resource_registry(&self) -> &Arc<ResourceRegistry> {
        &self.resource_registry
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Tool catalog grouped by domain (for the `tools/manifest` listing).
    pub fn manifest(&self) -> serde_json::Value {
        ToolRegistry::manifest()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn call_tool_by_name(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> CallToolResult {
        self.tool_registry.call_tool(name, arguments).await
    }

    /// List all available resources (for HTTP transport).
    pub async fn list_resources_json(&self) -> Vec<serde_json::Value> {
        self.resource_service
            .list_resources()
            .await
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.raw.uri,
                    "name": r.raw.name,
                    "description": r.raw.description,
                    "mimeType": r.raw.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI (for HTTP transport).
    pub async fn read_resource_json(&self, uri: &str) -> Result<serde_json::Value, String> {
        match self.resource_service.read_resource(uri).await {
            Ok(result) => Ok(serde_json::json!({ "contents": result.contents })),
            Err(e) => Err(e.to_string()),
        }
    }

    /// List all available resource templates (for HTTP transport).
    pub async fn list_resource_templates_json(&self) -> Vec<serde_json::Value> {
        self.resource_service
            .list_resource_templates()
            .await
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "uriTemplate": t.raw.uri_template,
                    "name": t.raw.name,
                    "title": t.raw.title,
                    "description": t.raw.description,
                    "mimeType": t.raw.mime_type
                })
            })
            .collect()
    }

    /// List all available prompts (for HTTP transport).
    pub async fn list_prompts_json(&self) -> Vec<serde_json::Value> {
        self.prompt_service
            .list_prompts()
            .await
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "description": p.description,
                    "arguments": p.arguments
                })
            })
            .collect()
    }

    /// Get a prompt by name (for HTTP transport).
    pub async fn get_prompt_json(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, String> {
        let args = string_arguments(arguments.as_ref());
        match self.prompt_service.get_prompt(name, Some(args)).await {
            Ok(result) => Ok(serde_json::json!({
                "description": result.description,
                "messages": result.messages
            })),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Execute a prompt by resolving it to its tool and calling that tool.
    ///
    /// Prompt arguments whose names differ from the tool's parameters are
    /// renamed per the prompt spec before dispatch.
    pub async fn execute_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<CallToolResult, String> {
        let args = string_arguments(arguments.as_ref());
        let spec = self
            .prompt_service
            .resolve_tool(name, &args)
            .map_err(|e| e.to_string())?;
        info!("Prompt {} dispatching to tool {}", name, spec.tool);

        let tool_args = rename_arguments(
            arguments.unwrap_or_else(|| serde_json::json!({})),
            spec.arg_renames,
        );
        Ok(self.call_tool_by_name(spec.tool, tool_args).await)
    }
}

/// Rewrite prompt-argument keys into the mapped tool's parameter names.
fn rename_arguments(
    mut arguments: serde_json::Value,
    renames: &[(&str, &str)],
) -> serde_json::Value {
    if let Some(obj) = arguments.as_object_mut() {
        for (from, to) in renames {
            if let Some(value) = obj.remove(*from) {
                obj.insert((*to).to_string(), value);
            }
        }
    }
    arguments
}

/// Flatten a JSON argument object into the string map prompts expect.
fn string_arguments(arguments: Option<&serde_json::Value>) -> HashMap<String, String> {
    arguments
        .and_then(|v| v.as_object())
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| {
                    let text = match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "NASA and JPL data server. Tools query NASA open APIs (APOD, NEO, EPIC, GIBS, \
                 CMR, FIRMS, image library, Exoplanet Archive, DONKI, Mars rover photos, EONET, \
                 POWER) and JPL solar-system dynamics APIs (SBDB, fireballs, Scout, close \
                 approaches). Results from imagery and catalog tools are cached as resources \
                 under nasa:// and jpl:// URIs."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        let templates = self.resource_service.list_resource_templates().await;
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        let arguments = request.arguments.map(|map| {
            map.into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect()
        });
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}
