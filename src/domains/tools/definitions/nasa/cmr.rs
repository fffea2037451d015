//! NASA Common Metadata Repository (CMR) collection search.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, json_result, push_param,
};

const CMR_SEARCH_URL: &str = "https://cmr.earthdata.nasa.gov/search/collections.json";

/// CMR requests should identify their client.
const CLIENT_ID: (&str, &str) = ("Client-Id", "NASA-MCP-Server");

fn default_limit() -> u32 {
    10
}

fn default_page() -> u32 {
    1
}

/// Parameters for the CMR tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CmrParams {
    /// Search keyword.
    #[schemars(description = "Keyword to search Earth science data collections for")]
    pub keyword: String,

    /// Maximum number of collections to return.
    #[schemars(description = "Maximum number of results (default: 10)")]
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Result page.
    #[schemars(description = "Result page number (default: 1)")]
    #[serde(default = "default_page")]
    pub page: u32,

    /// Sort key, e.g. `-usage_score`.
    #[schemars(description = "CMR sort key, e.g. 'start_date' or '-usage_score'")]
    #[serde(default)]
    pub sort_key: Option<String>,
}

/// CMR tool implementation.
pub struct CmrTool;

#[async_trait]
impl ToolDefinition for CmrTool {
    const NAME: &'static str = "nasa/cmr";
    const DESCRIPTION: &'static str = "Search NASA's Common Metadata Repository for Earth \
        science data collections by keyword.";
    type Params = CmrParams;

    async fn execute(context: &ToolContext, params: CmrParams) -> CallToolResult {
        info!("Searching CMR for '{}'", params.keyword);

        let query = build_query(&params);
        match context
            .client
            .get_json_with_header(CMR_SEARCH_URL, &query, CLIENT_ID)
            .await
        {
            Ok(body) => json_result(&body),
            Err(e) => gateway_error(e),
        }
    }
}

/// CMR uses `page_size`/`page_num` rather than limit/page.
fn build_query(params: &CmrParams) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("keyword", params.keyword.clone()),
        ("page_size", params.limit.to_string()),
        ("page_num", params.page.to_string()),
    ];
    push_param(&mut query, "sort_key", params.sort_key.as_ref());
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params: CmrParams = serde_json::from_str(r#"{"keyword": "aerosol"}"#).unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.page, 1);
        assert!(params.sort_key.is_none());
    }

    #[test]
    fn test_build_query_renames_pagination() {
        let params = CmrParams {
            keyword: "aerosol".to_string(),
            limit: 25,
            page: 3,
            sort_key: Some("-usage_score".to_string()),
        };
        let query = build_query(&params);
        assert!(query.contains(&("page_size", "25".to_string())));
        assert!(query.contains(&("page_num", "3".to_string())));
        assert!(query.contains(&("sort_key", "-usage_score".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "limit" || *k == "page"));
    }
}
