//! Tool router - builds the rmcp ToolRouter from the tool definitions.
//!
//! Each route delegates to the same definitions the registry dispatches to,
//! so the stdio transport and the HTTP transport can never disagree about
//! which tools exist.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::route_for;
use crate::domains::tools::definitions::jpl::{CadTool, FireballTool, SbdbTool, ScoutTool};
use crate::domains::tools::definitions::nasa::{
    ApodTool, CmrTool, DonkiTool, EonetTool, EpicTool, ExoplanetTool, FirmsTool, GibsTool,
    ImagesTool, MarsRoverTool, NeoTool, PowerTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(context: Arc<ToolContext>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(route_for::<ApodTool, S>(context.clone()))
        .with_route(route_for::<NeoTool, S>(context.clone()))
        .with_route(route_for::<EpicTool, S>(context.clone()))
        .with_route(route_for::<GibsTool, S>(context.clone()))
        .with_route(route_for::<CmrTool, S>(context.clone()))
        .with_route(route_for::<FirmsTool, S>(context.clone()))
        .with_route(route_for::<ImagesTool, S>(context.clone()))
        .with_route(route_for::<ExoplanetTool, S>(context.clone()))
        .with_route(route_for::<DonkiTool, S>(context.clone()))
        .with_route(route_for::<MarsRoverTool, S>(context.clone()))
        .with_route(route_for::<EonetTool, S>(context.clone()))
        .with_route(route_for::<PowerTool, S>(context.clone()))
        .with_route(route_for::<SbdbTool, S>(context.clone()))
        .with_route(route_for::<FireballTool, S>(context.clone()))
        .with_route(route_for::<ScoutTool, S>(context.clone()))
        .with_route(route_for::<CadTool, S>(context))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::domains::tools::context::test_context;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_context());
        let tools = router.list_all();
        assert_eq!(tools.len(), 16);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"nasa/apod"));
        assert!(names.contains(&"nasa/mars-rover"));
        assert!(names.contains(&"jpl/sbdb"));
        assert!(names.contains(&"jpl/cad"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Registry and router are built from the same definitions.
        let registry_names = ToolRegistry::tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(test_context());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
