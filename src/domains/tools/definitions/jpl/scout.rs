//! JPL Scout - hazard assessment for unconfirmed NEO candidates.
//!
//! Scout tracks objects on the Minor Planet Center's confirmation page before
//! they receive designations. With no filters it returns the current
//! candidate list.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, json_result, push_param,
};

/// Parameters for the Scout tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ScoutParams {
    /// Candidate orbit ID.
    #[schemars(description = "Scout internal orbit ID of a specific candidate")]
    #[serde(default)]
    pub orbit_id: Option<String>,

    /// Temporary designation.
    #[schemars(description = "Temporary designation of a candidate, e.g. 'P21Eolo'")]
    #[serde(default)]
    pub tdes: Option<String>,
}

/// Scout tool implementation.
pub struct ScoutTool;

#[async_trait]
impl ToolDefinition for ScoutTool {
    const NAME: &'static str = "jpl/scout";
    const DESCRIPTION: &'static str = "Check JPL Scout hazard assessments for unconfirmed \
        near-Earth object candidates awaiting confirmation.";
    type Params = ScoutParams;

    async fn execute(context: &ToolContext, params: ScoutParams) -> CallToolResult {
        info!(
            "Fetching Scout data (orbit_id: {:?}, tdes: {:?})",
            params.orbit_id, params.tdes
        );

        let mut query = Vec::new();
        push_param(&mut query, "orbit_id", params.orbit_id.as_ref());
        push_param(&mut query, "tdes", params.tdes.as_ref());

        match context.client.jpl_get("/scout.api", &query).await {
            Ok(body) => json_result(&body),
            Err(e) => gateway_error(e),
        }
    }
}
