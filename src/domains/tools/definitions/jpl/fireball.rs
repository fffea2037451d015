//! JPL fireball atmospheric-impact data.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, json_result, push_param,
};

/// Parameters for the fireball tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FireballParams {
    /// Earliest event date.
    #[schemars(description = "Earliest fireball date (YYYY-MM-DD)")]
    #[serde(default)]
    pub date_min: Option<String>,

    /// Latest event date.
    #[schemars(description = "Latest fireball date (YYYY-MM-DD)")]
    #[serde(default)]
    pub date_max: Option<String>,

    /// Minimum impact energy.
    #[schemars(description = "Minimum total impact energy in kilotons, e.g. 1.0")]
    #[serde(default)]
    pub energy_min: Option<f64>,

    /// Maximum number of records.
    #[schemars(description = "Maximum number of records to return")]
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Fireball tool implementation.
pub struct FireballTool;

#[async_trait]
impl ToolDefinition for FireballTool {
    const NAME: &'static str = "jpl/fireball";
    const DESCRIPTION: &'static str = "List fireball events (bright meteors) recorded by US \
        government sensors, with energy, altitude, and location.";
    type Params = FireballParams;

    async fn execute(context: &ToolContext, params: FireballParams) -> CallToolResult {
        info!(
            "Fetching fireball events ({:?}..{:?})",
            params.date_min, params.date_max
        );

        let mut query = Vec::new();
        push_param(&mut query, "date-min", params.date_min.as_ref());
        push_param(&mut query, "date-max", params.date_max.as_ref());
        push_param(&mut query, "energy-min", params.energy_min);
        push_param(&mut query, "limit", params.limit);

        match context.client.jpl_get("/fireball.api", &query).await {
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
        let params: FireballParams = serde_json::from_str("{}").unwrap();
        assert!(params.date_min.is_none());
        assert!(params.energy_min.is_none());
    }

    #[test]
    fn test_params_parse_filters() {
        let params: FireballParams = serde_json::from_str(
            r#"{"date_min": "2020-01-01", "energy_min": 0.5, "limit": 20}"#,
        )
        .unwrap();
        assert_eq!(params.energy_min, Some(0.5));
        assert_eq!(params.limit, Some(20));
    }
}
