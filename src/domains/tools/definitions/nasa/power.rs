//! NASA POWER - Prediction Of Worldwide Energy Resources.
//!
//! Daily meteorology and solar data for a point, aimed at renewable-energy
//! and agricultural use cases.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{ToolDefinition, gateway_error, json_result};

const POWER_DAILY_POINT_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";

/// Parameters for the POWER tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PowerParams {
    /// Comma-separated parameter codes.
    #[schemars(description = "Comma-separated POWER parameters, e.g. 'T2M,PRECTOTCORR,WS10M'")]
    pub parameters: String,

    /// User community the data is shaped for.
    #[schemars(description = "User community: 're' (renewable energy), 'sb' (sustainable \
        buildings), or 'ag' (agroclimatology)")]
    pub community: String,

    /// Longitude of the point.
    #[schemars(description = "Longitude of the point of interest")]
    pub longitude: f64,

    /// Latitude of the point.
    #[schemars(description = "Latitude of the point of interest")]
    pub latitude: f64,

    /// Start of the date range.
    #[schemars(description = "Start date (YYYYMMDD)")]
    pub start: String,

    /// End of the date range.
    #[schemars(description = "End date (YYYYMMDD)")]
    pub end: String,
}

/// POWER tool implementation.
pub struct PowerTool;

#[async_trait]
impl ToolDefinition for PowerTool {
    const NAME: &'static str = "nasa/power";
    const DESCRIPTION: &'static str = "Fetch daily meteorology and solar-energy data for a point \
        from NASA's POWER project.";
    type Params = PowerParams;

    async fn execute(context: &ToolContext, params: PowerParams) -> CallToolResult {
        info!(
            "Fetching POWER daily data at ({}, {}) for {}..{}",
            params.latitude, params.longitude, params.start, params.end
        );

        let query = build_query(&params);
        match context.client.get_json(POWER_DAILY_POINT_URL, &query).await {
            Ok(body) => json_result(&body),
            Err(e) => gateway_error(e),
        }
    }
}

fn build_query(params: &PowerParams) -> Vec<(&'static str, String)> {
    vec![
        ("parameters", params.parameters.clone()),
        ("community", params.community.clone()),
        ("longitude", params.longitude.to_string()),
        ("latitude", params.latitude.to_string()),
        ("start", params.start.clone()),
        ("end", params.end.clone()),
        ("format", "JSON".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_all_required() {
        assert!(serde_json::from_str::<PowerParams>(r#"{"parameters": "T2M"}"#).is_err());
        let params: PowerParams = serde_json::from_str(
            r#"{
                "parameters": "T2M,PRECTOTCORR",
                "community": "ag",
                "longitude": -103.5,
                "latitude": 44.0,
                "start": "20230101",
                "end": "20230131"
            }"#,
        )
        .unwrap();
        assert_eq!(params.community, "ag");
    }

    #[test]
    fn test_build_query_requests_json() {
        let params = PowerParams {
            parameters: "T2M".to_string(),
            community: "re".to_string(),
            longitude: 2.35,
            latitude: 48.85,
            start: "20230101".to_string(),
            end: "20230107".to_string(),
        };
        let query = build_query(&params);
        assert!(query.contains(&("format", "JSON".to_string())));
        assert!(query.contains(&("longitude", "2.35".to_string())));
        assert!(query.contains(&("community", "re".to_string())));
    }
}
