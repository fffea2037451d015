//! NASA Astronomy Picture of the Day (APOD).
//!
//! Fetches the picture of the day (or a range/random sample), renders a
//! markdown summary, and caches each entry as a `nasa://apod/...` resource.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domains::resources::StoredResource;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, push_param, success_result,
};

/// Parameters for the APOD tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ApodParams {
    /// Date of the picture to retrieve.
    #[schemars(description = "Date of the picture (YYYY-MM-DD). Defaults to today")]
    #[serde(default)]
    pub date: Option<String>,

    /// Start of a date range (cannot be combined with `date` or `count`).
    #[schemars(description = "Start of a date range (YYYY-MM-DD)")]
    #[serde(default)]
    pub start_date: Option<String>,

    /// End of a date range.
    #[schemars(description = "End of a date range (YYYY-MM-DD)")]
    #[serde(default)]
    pub end_date: Option<String>,

    /// Number of random pictures to return.
    #[schemars(description = "Number of randomly chosen pictures to return")]
    #[serde(default)]
    pub count: Option<u32>,

    /// Whether to return video thumbnail URLs.
    #[schemars(description = "Return thumbnail URLs for video entries")]
    #[serde(default)]
    pub thumbs: Option<bool>,
}

/// APOD tool implementation.
pub struct ApodTool;

#[async_trait]
impl ToolDefinition for ApodTool {
    const NAME: &'static str = "nasa/apod";
    const DESCRIPTION: &'static str = "Fetch NASA's Astronomy Picture of the Day. Supports a \
        single date, a date range, or a random sample, and caches each picture's metadata as a \
        readable resource.";
    type Params = ApodParams;

    async fn execute(context: &ToolContext, params: ApodParams) -> CallToolResult {
        info!("Fetching APOD (date: {:?})", params.date);

        let query = build_query(&params);
        let body = match context.client.nasa_get("/planetary/apod", &query).await {
            Ok(body) => body,
            Err(e) => return gateway_error(e),
        };

        let items = as_items(body);
        cache_items(context, &items);
        success_result(summarize(&items))
    }
}

fn build_query(params: &ApodParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    push_param(&mut query, "date", params.date.as_ref());
    push_param(&mut query, "start_date", params.start_date.as_ref());
    push_param(&mut query, "end_date", params.end_date.as_ref());
    push_param(&mut query, "count", params.count);
    push_param(&mut query, "thumbs", params.thumbs);
    query
}

/// The API returns a single object for one date, an array for ranges.
fn as_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn summarize(items: &[Value]) -> String {
    let mut summary = String::from("# Astronomy Picture of the Day\n");
    for item in items {
        let title = item.get("title").and_then(Value::as_str).unwrap_or("Untitled");
        let date = item.get("date").and_then(Value::as_str).unwrap_or("unknown");
        let explanation = item.get("explanation").and_then(Value::as_str).unwrap_or("");
        summary.push_str(&format!("\n## {title} ({date})\n\n{explanation}\n"));
        if let Some(url) = item.get("hdurl").or_else(|| item.get("url")).and_then(Value::as_str) {
            summary.push_str(&format!("\nImage: {url}\n"));
        }
    }
    summary
}

/// Cache each returned entry under its date-scoped URI.
fn cache_items(context: &ToolContext, items: &[Value]) {
    for item in items {
        let Some(date) = item.get("date").and_then(Value::as_str) else {
            continue;
        };
        let text = serde_json::to_string_pretty(item).unwrap_or_else(|_| item.to_string());
        context.resources.put(
            format!("nasa://apod/image?date={date}"),
            StoredResource::text(
                format!("Astronomy Picture of the Day ({date})"),
                "application/json",
                text,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::test_context;
    use crate::domains::tools::definitions::common::result_text;

    fn sample_item() -> Value {
        serde_json::json!({
            "date": "2023-01-01",
            "title": "The Largest Rock in our Solar System",
            "explanation": "Earth is the largest rock in the Solar System.",
            "url": "https://apod.nasa.gov/apod/image/2301/earth.jpg"
        })
    }

    #[test]
    fn test_params_all_optional() {
        let params: ApodParams = serde_json::from_str("{}").unwrap();
        assert!(params.date.is_none());
        assert!(params.count.is_none());
    }

    #[test]
    fn test_build_query_skips_absent_fields() {
        let params = ApodParams {
            date: Some("2023-01-01".to_string()),
            ..Default::default()
        };
        let query = build_query(&params);
        assert_eq!(query, vec![("date", "2023-01-01".to_string())]);
    }

    #[test]
    fn test_summarize_contains_title_and_explanation() {
        let summary = summarize(&[sample_item()]);
        assert!(summary.contains("The Largest Rock in our Solar System"));
        assert!(summary.contains("Earth is the largest rock"));
        assert!(summary.contains("2023-01-01"));
    }

    #[test]
    fn test_as_items_wraps_single_object() {
        assert_eq!(as_items(sample_item()).len(), 1);
        assert_eq!(as_items(Value::Array(vec![sample_item(), sample_item()])).len(), 2);
    }

    #[tokio::test]
    async fn test_cache_items_registers_resource() {
        let context = test_context();
        cache_items(&context, &[sample_item()]);
        let stored = context
            .resources
            .get("nasa://apod/image?date=2023-01-01")
            .unwrap();
        assert!(stored.name.contains("2023-01-01"));
    }

    #[tokio::test]
    async fn test_execute_without_api_key_is_error_envelope() {
        let context = test_context();
        let result = ApodTool::execute(&context, ApodParams::default()).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("NASA_API_KEY"));
    }
}
