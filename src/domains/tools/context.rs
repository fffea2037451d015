//! Shared execution context handed to every tool.

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::gateway::ApiClient;
use crate::domains::resources::ResourceRegistry;

/// State every tool handler needs: configuration, the upstream API client,
/// and the resource registry for caching derived resources.
///
/// The context is passed explicitly through the router and registry; there
/// are no process-global singletons.
#[derive(Clone)]
pub struct ToolContext {
    /// Server configuration.
    pub config: Arc<Config>,

    /// Gateway to the upstream NASA and JPL APIs.
    pub client: ApiClient,

    /// Registry where tools cache derived resources.
    pub resources: Arc<ResourceRegistry>,
}

impl ToolContext {
    /// Build the context from configuration and the shared resource registry.
    pub fn new(config: Arc<Config>, resources: Arc<ResourceRegistry>) -> crate::core::Result<Self> {
        let client = ApiClient::new(&config)?;
        Ok(Self {
            config,
            client,
            resources,
        })
    }
}

/// Context for unit tests: default configuration, no API key.
#[cfg(test)]
pub fn test_context() -> Arc<ToolContext> {
    let config = Arc::new(Config::default());
    let resources = Arc::new(ResourceRegistry::new());
    Arc::new(ToolContext::new(config, resources).unwrap())
}
