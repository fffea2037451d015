//! NASA Exoplanet Archive TAP queries.
//!
//! Builds an ADQL query against the archive's synchronous TAP endpoint. The
//! archive runs on Oracle, so row limits use `ROWNUM` rather than `LIMIT`.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{ToolDefinition, gateway_error, json_result};

const TAP_SYNC_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";

fn default_select() -> String {
    "*".to_string()
}

/// Parameters for the exoplanet archive tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExoplanetParams {
    /// Table to query.
    #[schemars(description = "Archive table, e.g. 'ps' (planetary systems) or 'cumulative'")]
    pub table: String,

    /// Columns to select.
    #[schemars(description = "Columns to select (default: all)")]
    #[serde(default = "default_select")]
    pub select: String,

    /// Filter condition.
    #[schemars(description = "ADQL WHERE condition, e.g. \"disc_year > 2020\"")]
    #[serde(default)]
    pub r#where: Option<String>,

    /// Sort order.
    #[schemars(description = "ADQL ORDER BY expression, e.g. 'disc_year desc'")]
    #[serde(default)]
    pub order: Option<String>,

    /// Maximum number of rows.
    #[schemars(description = "Maximum number of rows to return")]
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Exoplanet archive tool implementation.
pub struct ExoplanetTool;

#[async_trait]
impl ToolDefinition for ExoplanetTool {
    const NAME: &'static str = "nasa/exoplanet";
    const DESCRIPTION: &'static str = "Query the NASA Exoplanet Archive with ADQL over its TAP \
        service, covering confirmed planets and Kepler candidates.";
    type Params = ExoplanetParams;

    async fn execute(context: &ToolContext, params: ExoplanetParams) -> CallToolResult {
        let adql = build_adql(&params);
        info!("Exoplanet archive query: {}", adql);

        let query = vec![("query", adql), ("format", "json".to_string())];
        match context.client.get_json(TAP_SYNC_URL, &query).await {
            Ok(body) => json_result(&body),
            Err(e) => gateway_error(e),
        }
    }
}

fn build_adql(params: &ExoplanetParams) -> String {
    let mut adql = format!("select {} from {}", params.select, params.table);

    match (&params.r#where, params.limit) {
        (Some(condition), Some(limit)) => {
            adql.push_str(&format!(" where ({condition}) and rownum <= {limit}"));
        }
        (Some(condition), None) => adql.push_str(&format!(" where {condition}")),
        (None, Some(limit)) => adql.push_str(&format!(" where rownum <= {limit}")),
        (None, None) => {}
    }

    if let Some(order) = &params.order {
        adql.push_str(&format!(" order by {order}"));
    }
    adql
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ExoplanetParams {
        ExoplanetParams {
            table: "ps".to_string(),
            select: default_select(),
            r#where: None,
            order: None,
            limit: None,
        }
    }

    #[test]
    fn test_params_default_select() {
        let parsed: ExoplanetParams = serde_json::from_str(r#"{"table": "ps"}"#).unwrap();
        assert_eq!(parsed.select, "*");
    }

    #[test]
    fn test_adql_bare_query() {
        assert_eq!(build_adql(&params()), "select * from ps");
    }

    #[test]
    fn test_adql_limit_uses_rownum() {
        let query = ExoplanetParams {
            limit: Some(5),
            ..params()
        };
        assert_eq!(build_adql(&query), "select * from ps where rownum <= 5");
    }

    #[test]
    fn test_adql_where_and_limit_combined() {
        let query = ExoplanetParams {
            r#where: Some("disc_year > 2020".to_string()),
            limit: Some(10),
            order: Some("disc_year desc".to_string()),
            ..params()
        };
        assert_eq!(
            build_adql(&query),
            "select * from ps where (disc_year > 2020) and rownum <= 10 order by disc_year desc"
        );
    }
}
