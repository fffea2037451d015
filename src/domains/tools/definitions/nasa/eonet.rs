//! NASA EONET - Earth Observatory Natural Event Tracker.
//!
//! Lists natural events (wildfires, storms, volcanoes). A first query that
//! matches nothing is retried once with broadened filters so callers get
//! something useful back instead of an empty list.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, json_result, push_param,
};

const EONET_EVENTS_URL: &str = "https://eonet.gsfc.nasa.gov/api/v3/events";

/// Broadened filters used for the retry when the first query is empty.
const RETRY_STATUS: &str = "all";
const RETRY_DAYS: u32 = 90;
const RETRY_LIMIT: u32 = 50;

/// Event status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Open,
    Closed,
    All,
}

impl EventStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Parameters for the EONET tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EonetParams {
    /// Category filter.
    #[schemars(description = "Event category, e.g. 'wildfires', 'severeStorms', 'volcanoes'")]
    #[serde(default)]
    pub category: Option<String>,

    /// Look-back window in days.
    #[schemars(description = "Only include events from the last N days")]
    #[serde(default)]
    pub days: Option<u32>,

    /// Source filter.
    #[schemars(description = "Event source, e.g. 'InciWeb' or 'EO'")]
    #[serde(default)]
    pub source: Option<String>,

    /// Status filter.
    #[schemars(description = "Event status: 'open', 'closed', or 'all'")]
    #[serde(default)]
    pub status: Option<EventStatus>,

    /// Maximum number of events.
    #[schemars(description = "Maximum number of events to return")]
    #[serde(default)]
    pub limit: Option<u32>,
}

/// EONET tool implementation.
pub struct EonetTool;

#[async_trait]
impl ToolDefinition for EonetTool {
    const NAME: &'static str = "nasa/eonet";
    const DESCRIPTION: &'static str = "Track natural events around the world (wildfires, storms, \
        volcanoes) via NASA's Earth Observatory Natural Event Tracker.";
    type Params = EonetParams;

    async fn execute(context: &ToolContext, params: EonetParams) -> CallToolResult {
        info!("Fetching EONET events (category: {:?})", params.category);

        let query = build_query(&params);
        let body = match context.client.get_json(EONET_EVENTS_URL, &query).await {
            Ok(body) => body,
            Err(e) => return gateway_error(e),
        };

        if !events_are_empty(&body) {
            return json_result(&body);
        }

        // Nothing matched; widen the window and status and try once more.
        info!("No EONET events matched; retrying with broadened filters");
        let retry_query = broadened_query(&params);
        match context.client.get_json(EONET_EVENTS_URL, &retry_query).await {
            Ok(mut retry_body) => {
                if let Some(obj) = retry_body.as_object_mut() {
                    obj.insert(
                        "note".to_string(),
                        json!(format!(
                            "No events matched the original filters; showing results for \
                             status={RETRY_STATUS}, days={RETRY_DAYS}, limit={RETRY_LIMIT}."
                        )),
                    );
                }
                json_result(&retry_body)
            }
            Err(e) => gateway_error(e),
        }
    }
}

fn build_query(params: &EonetParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    push_param(&mut query, "category", params.category.as_ref());
    push_param(&mut query, "days", params.days);
    push_param(&mut query, "source", params.source.as_ref());
    push_param(&mut query, "status", params.status.map(EventStatus::as_str));
    push_param(&mut query, "limit", params.limit);
    query
}

fn broadened_query(params: &EonetParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    // Category and source are intent, not narrowing noise; keep them.
    push_param(&mut query, "category", params.category.as_ref());
    push_param(&mut query, "source", params.source.as_ref());
    query.push(("status", RETRY_STATUS.to_string()));
    query.push(("days", RETRY_DAYS.to_string()));
    query.push(("limit", RETRY_LIMIT.to_string()));
    query
}

fn events_are_empty(body: &Value) -> bool {
    body.get("events")
        .and_then(Value::as_array)
        .is_none_or(|events| events.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_all_optional() {
        let params: EonetParams = serde_json::from_str("{}").unwrap();
        assert!(build_query(&params).is_empty());
    }

    #[test]
    fn test_build_query_includes_filters() {
        let params: EonetParams = serde_json::from_str(
            r#"{"category": "wildfires", "status": "open", "days": 7}"#,
        )
        .unwrap();
        let query = build_query(&params);
        assert!(query.contains(&("category", "wildfires".to_string())));
        assert!(query.contains(&("status", "open".to_string())));
        assert!(query.contains(&("days", "7".to_string())));
    }

    #[test]
    fn test_broadened_query_keeps_category() {
        let params: EonetParams =
            serde_json::from_str(r#"{"category": "volcanoes", "days": 1, "limit": 2}"#).unwrap();
        let query = broadened_query(&params);
        assert!(query.contains(&("category", "volcanoes".to_string())));
        assert!(query.contains(&("status", "all".to_string())));
        assert!(query.contains(&("days", "90".to_string())));
        assert!(query.contains(&("limit", "50".to_string())));
    }

    #[test]
    fn test_events_are_empty() {
        assert!(events_are_empty(&json!({"events": []})));
        assert!(events_are_empty(&json!({})));
        assert!(!events_are_empty(&json!({"events": [{"id": "EONET_1"}]})));
    }
}
