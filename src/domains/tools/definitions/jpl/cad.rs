//! JPL close-approach data.
//!
//! Queries SBDB close-approach records: objects passing near Earth (or
//! another body) within a date and distance window.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, json_result, push_param,
};

/// Parameters for the close-approach tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CadParams {
    /// Earliest approach date.
    #[schemars(description = "Earliest close-approach date (YYYY-MM-DD, or 'now')")]
    #[serde(default)]
    pub date_min: Option<String>,

    /// Latest approach date.
    #[schemars(description = "Latest close-approach date (YYYY-MM-DD, or '+60' for days ahead)")]
    #[serde(default)]
    pub date_max: Option<String>,

    /// Maximum approach distance.
    #[schemars(description = "Maximum approach distance in au, e.g. '0.05', or in lunar \
        distances with an LD suffix, e.g. '10LD'")]
    #[serde(default)]
    pub dist_max: Option<String>,

    /// Body being approached.
    #[schemars(description = "Body being approached (default: Earth). E.g. 'Earth', 'Mars', 'ALL'")]
    #[serde(default)]
    pub body: Option<String>,
}

/// Close-approach tool implementation.
pub struct CadTool;

#[async_trait]
impl ToolDefinition for CadTool {
    const NAME: &'static str = "jpl/cad";
    const DESCRIPTION: &'static str = "Find close approaches of asteroids and comets to Earth or \
        other bodies from JPL's close-approach database.";
    type Params = CadParams;

    async fn execute(context: &ToolContext, params: CadParams) -> CallToolResult {
        info!(
            "Fetching close approaches ({:?}..{:?})",
            params.date_min, params.date_max
        );

        let mut query = Vec::new();
        push_param(&mut query, "date-min", params.date_min.as_ref());
        push_param(&mut query, "date-max", params.date_max.as_ref());
        push_param(&mut query, "dist-max", params.dist_max.as_ref());
        push_param(&mut query, "body", params.body.as_ref());

        match context.client.jpl_get("/cad.api", &query).await {
            Ok(body) => json_result(&body),
            Err(e) => gateway_error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_all_optional() {
        let params: CadParams = serde_json::from_str("{}").unwrap();
        assert!(params.date_min.is_none());
        assert!(params.body.is_none());
    }

    #[test]
    fn test_params_parse_window() {
        let params: CadParams = serde_json::from_str(
            r#"{"date_min": "now", "date_max": "+60", "dist_max": "10LD"}"#,
        )
        .unwrap();
        assert_eq!(params.date_min.as_deref(), Some("now"));
        assert_eq!(params.dist_max.as_deref(), Some("10LD"));
    }
}
