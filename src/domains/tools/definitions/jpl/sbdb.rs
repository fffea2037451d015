//! JPL Small-Body Database lookups.
//!
//! Looks up asteroids and comets by name, designation, or SPK-ID. Optional
//! flags are forwarded only when they differ from the upstream defaults, so a
//! plain lookup stays a single-parameter query.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{ToolDefinition, gateway_error, json_result};

/// Parameters for the small-body database tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SbdbParams {
    /// Object to look up.
    #[schemars(description = "Object name, designation, or SPK-ID, e.g. 'Ceres' or '433'")]
    pub sstr: String,

    /// Request full-precision orbital elements.
    #[schemars(description = "Return orbital elements at full precision")]
    #[serde(default)]
    pub full_precision: bool,

    /// Include physical parameters.
    #[schemars(description = "Include physical parameters (diameter, albedo, rotation)")]
    #[serde(default)]
    pub phys_par: bool,

    /// Include close-approach data.
    #[schemars(description = "Include close-approach data for the object")]
    #[serde(default)]
    pub ca_data: bool,
}

/// Small-body database tool implementation.
pub struct SbdbTool;

#[async_trait]
impl ToolDefinition for SbdbTool {
    const NAME: &'static str = "jpl/sbdb";
    const DESCRIPTION: &'static str = "Look up asteroids and comets in JPL's Small-Body Database \
        by name, designation, or SPK-ID.";
    type Params = SbdbParams;

    async fn execute(context: &ToolContext, params: SbdbParams) -> CallToolResult {
        info!("Looking up small body '{}'", params.sstr);

        let query = build_query(&params);
        match context.client.jpl_get("/sbdb.api", &query).await {
            Ok(body) => json_result(&body),
            Err(e) => gateway_error(e),
        }
    }
}

fn build_query(params: &SbdbParams) -> Vec<(&'static str, String)> {
    let mut query = vec![("sstr", params.sstr.clone())];
    if params.full_precision {
        query.push(("full-prec", "yes".to_string()));
    }
    if params.phys_par {
        query.push(("phys-par", "yes".to_string()));
    }
    if params.ca_data {
        query.push(("ca-data", "yes".to_string()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_require_sstr() {
        assert!(serde_json::from_str::<SbdbParams>("{}").is_err());
    }

    #[test]
    fn test_build_query_default_lookup_is_sstr_only() {
        let params: SbdbParams = serde_json::from_str(r#"{"sstr": "Ceres"}"#).unwrap();
        assert_eq!(build_query(&params), vec![("sstr", "Ceres".to_string())]);
    }

    #[test]
    fn test_build_query_flags_forwarded_as_yes() {
        let params: SbdbParams = serde_json::from_str(
            r#"{"sstr": "433", "full_precision": true, "ca_data": true}"#,
        )
        .unwrap();
        let query = build_query(&params);
        assert!(query.contains(&("full-prec", "yes".to_string())));
        assert!(query.contains(&("ca-data", "yes".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "phys-par"));
    }
}
