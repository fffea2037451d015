//! NASA Near Earth Object Web Service (NeoWs).
//!
//! Looks up a single asteroid by id, or browses the close-approach feed for
//! a date range. Feed results are summarized and cached as a resource.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domains::resources::StoredResource;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, json_result, success_result, today,
};

/// Parameters for the NEO tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NeoParams {
    /// Start of the feed date range.
    #[schemars(description = "Start of the date range (YYYY-MM-DD). Defaults to today")]
    #[serde(default)]
    pub start_date: Option<String>,

    /// End of the feed date range.
    #[schemars(description = "End of the date range (YYYY-MM-DD). Defaults to start_date")]
    #[serde(default)]
    pub end_date: Option<String>,

    /// Look up one asteroid instead of browsing the feed.
    #[schemars(description = "NeoWs asteroid id for a single-object lookup")]
    #[serde(default)]
    pub asteroid_id: Option<String>,
}

/// NEO tool implementation.
pub struct NeoTool;

#[async_trait]
impl ToolDefinition for NeoTool {
    const NAME: &'static str = "nasa/neo";
    const DESCRIPTION: &'static str = "Browse near-Earth objects making close approaches in a \
        date range, or look up a single asteroid by its NeoWs id.";
    type Params = NeoParams;

    async fn execute(context: &ToolContext, params: NeoParams) -> CallToolResult {
        if let Some(id) = &params.asteroid_id {
            return lookup_asteroid(context, id).await;
        }

        let start_date = params.start_date.unwrap_or_else(today);
        let end_date = params.end_date.unwrap_or_else(|| start_date.clone());
        info!("Fetching NEO feed {} .. {}", start_date, end_date);

        let query = vec![
            ("start_date", start_date.clone()),
            ("end_date", end_date.clone()),
        ];
        let body = match context.client.nasa_get("/neo/rest/v1/feed", &query).await {
            Ok(body) => body,
            Err(e) => return gateway_error(e),
        };

        cache_feed(context, &start_date, &body);
        success_result(summarize_feed(&start_date, &end_date, &body))
    }
}

async fn lookup_asteroid(context: &ToolContext, id: &str) -> CallToolResult {
    info!("Fetching NEO {}", id);
    let path = format!("/neo/rest/v1/neo/{id}");
    let body = match context.client.nasa_get(&path, &[]).await {
        Ok(body) => body,
        Err(e) => return gateway_error(e),
    };

    if let Some(name) = body.get("name").and_then(Value::as_str) {
        let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
        context.resources.put(
            format!("nasa://neo/object?id={id}"),
            StoredResource::text(format!("NEO: {name}"), "application/json", text),
        );
    }
    json_result(&body)
}

fn summarize_feed(start_date: &str, end_date: &str, body: &Value) -> String {
    let count = body
        .get("element_count")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let mut summary = format!(
        "# Near-Earth Objects ({start_date} to {end_date})\n\n{count} object(s) found.\n"
    );

    let Some(by_date) = body.get("near_earth_objects").and_then(Value::as_object) else {
        return summary;
    };

    let mut dates: Vec<_> = by_date.keys().collect();
    dates.sort();
    for date in dates {
        let Some(objects) = by_date.get(date).and_then(Value::as_array) else {
            continue;
        };
        summary.push_str(&format!("\n## {date}\n"));
        for object in objects {
            let name = object.get("name").and_then(Value::as_str).unwrap_or("?");
            let hazardous = object
                .get("is_potentially_hazardous_asteroid")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let diameter = object
                .pointer("/estimated_diameter/meters/estimated_diameter_max")
                .and_then(Value::as_f64);
            let distance = object
                .pointer("/close_approach_data/0/miss_distance/kilometers")
                .and_then(Value::as_str);

            summary.push_str(&format!("- {name}"));
            if let Some(d) = diameter {
                summary.push_str(&format!(", up to {d:.0} m across"));
            }
            if let Some(km) = distance {
                summary.push_str(&format!(", missing Earth by {km} km"));
            }
            if hazardous {
                summary.push_str(" [potentially hazardous]");
            }
            summary.push('\n');
        }
    }
    summary
}

fn cache_feed(context: &ToolContext, start_date: &str, body: &Value) {
    let text = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
    context.resources.put(
        format!("nasa://neo/list?date={start_date}"),
        StoredResource::text(
            format!("Near-Earth Objects ({start_date})"),
            "application/json",
            text,
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::test_context;
    use crate::domains::tools::definitions::common::result_text;

    fn sample_feed() -> Value {
        serde_json::json!({
            "element_count": 1,
            "near_earth_objects": {
                "2023-01-01": [{
                    "name": "(2023 AB)",
                    "is_potentially_hazardous_asteroid": true,
                    "estimated_diameter": {
                        "meters": { "estimated_diameter_max": 120.7 }
                    },
                    "close_approach_data": [{
                        "miss_distance": { "kilometers": "1234567.8" }
                    }]
                }]
            }
        })
    }

    #[test]
    fn test_params_defaults() {
        let params: NeoParams = serde_json::from_str("{}").unwrap();
        assert!(params.start_date.is_none());
        assert!(params.asteroid_id.is_none());
    }

    #[test]
    fn test_summarize_feed() {
        let summary = summarize_feed("2023-01-01", "2023-01-01", &sample_feed());
        assert!(summary.contains("1 object(s)"));
        assert!(summary.contains("(2023 AB)"));
        assert!(summary.contains("121 m across"));
        assert!(summary.contains("potentially hazardous"));
    }

    #[tokio::test]
    async fn test_cache_feed_registers_resource() {
        let context = test_context();
        cache_feed(&context, "2023-01-01", &sample_feed());
        assert!(context.resources.get("nasa://neo/list?date=2023-01-01").is_some());
    }

    #[tokio::test]
    async fn test_execute_without_api_key_is_error_envelope() {
        let context = test_context();
        let result = NeoTool::execute(&context, NeoParams::default()).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("NASA_API_KEY"));
    }
}
