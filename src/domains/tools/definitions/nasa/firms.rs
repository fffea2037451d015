//! NASA FIRMS - Fire Information for Resource Management System.
//!
//! Queries active-fire detections around a point. The upstream endpoint
//! replies with CSV, which is reshaped into JSON records with numeric fields
//! coerced to numbers.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::core::gateway::GatewayError;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, error_result, gateway_error, json_result,
};

const FIRMS_CSV_BASE: &str = "https://firms.modaps.eosdis.nasa.gov/api/area/csv";

/// VIIRS on Suomi NPP, near-real-time.
const FIRMS_SOURCE: &str = "VIIRS_SNPP_NRT";

/// Half-width in degrees of the search box around the requested point.
const SEARCH_BOX_HALF_WIDTH: f64 = 1.0;

fn default_days() -> u32 {
    1
}

/// Parameters for the FIRMS tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FirmsParams {
    /// Latitude of the search center.
    #[schemars(description = "Latitude of the point of interest (-90 to 90)")]
    pub latitude: f64,

    /// Longitude of the search center.
    #[schemars(description = "Longitude of the point of interest (-180 to 180)")]
    pub longitude: f64,

    /// How many days back to search.
    #[schemars(description = "Days of detections to include, 1-10 (default: 1)")]
    #[serde(default = "default_days")]
    pub days: u32,
}

/// FIRMS tool implementation.
pub struct FirmsTool;

#[async_trait]
impl ToolDefinition for FirmsTool {
    const NAME: &'static str = "nasa/firms";
    const DESCRIPTION: &'static str = "Find active fire detections from the VIIRS satellite \
        sensor near a latitude/longitude point.";
    type Params = FirmsParams;

    async fn execute(context: &ToolContext, params: FirmsParams) -> CallToolResult {
        if !(-90.0..=90.0).contains(&params.latitude)
            || !(-180.0..=180.0).contains(&params.longitude)
        {
            return error_result("Invalid arguments: latitude must be -90..90 and longitude -180..180");
        }
        info!(
            "Fetching FIRMS detections near ({}, {})",
            params.latitude, params.longitude
        );

        let Some(api_key) = context.config.credentials.nasa_api_key.clone() else {
            return gateway_error(GatewayError::MissingApiKey);
        };

        let url = build_url(&api_key, &params);
        let csv_body = match context.client.get_text(&url, &[]).await {
            Ok(body) => body,
            Err(e) => return gateway_error(e),
        };

        match parse_csv(&csv_body) {
            Ok(results) => json_result(&json!({
                "count": results.len(),
                "results": results,
            })),
            Err(e) => error_result(&format!("Failed to parse FIRMS response: {e}")),
        }
    }
}

/// Path layout: /{key}/{source}/{west,south,east,north}/{days}
fn build_url(api_key: &str, params: &FirmsParams) -> String {
    let west = params.longitude - SEARCH_BOX_HALF_WIDTH;
    let south = params.latitude - SEARCH_BOX_HALF_WIDTH;
    let east = params.longitude + SEARCH_BOX_HALF_WIDTH;
    let north = params.latitude + SEARCH_BOX_HALF_WIDTH;
    format!(
        "{FIRMS_CSV_BASE}/{api_key}/{FIRMS_SOURCE}/{west},{south},{east},{north}/{}",
        params.days
    )
}

/// Parse the CSV reply into JSON records, coercing numeric-looking fields.
fn parse_csv(body: &str) -> Result<Vec<Value>, csv::Error> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();

    let mut results = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Map::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), coerce(field));
        }
        results.push(Value::Object(row));
    }
    Ok(results)
}

fn coerce(field: &str) -> Value {
    if let Ok(n) = field.parse::<i64>() {
        return json!(n);
    }
    if let Ok(f) = field.parse::<f64>() {
        return json!(f);
    }
    Value::String(field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::test_context;
    use crate::domains::tools::definitions::common::result_text;

    fn params() -> FirmsParams {
        FirmsParams {
            latitude: 37.0,
            longitude: -120.5,
            days: 1,
        }
    }

    #[test]
    fn test_params_default_days() {
        let parsed: FirmsParams =
            serde_json::from_str(r#"{"latitude": 37.0, "longitude": -120.5}"#).unwrap();
        assert_eq!(parsed.days, 1);
    }

    #[test]
    fn test_build_url_box_around_point() {
        let url = build_url("KEY", &params());
        assert!(url.contains("/KEY/VIIRS_SNPP_NRT/-121.5,36,-119.5,38/1"));
    }

    #[test]
    fn test_parse_csv_coerces_numbers() {
        let csv = "latitude,longitude,confidence,acq_date\n36.5,-120.1,nominal,2023-01-01\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["latitude"], json!(36.5));
        assert_eq!(rows[0]["confidence"], json!("nominal"));
        assert_eq!(rows[0]["acq_date"], json!("2023-01-01"));
    }

    #[test]
    fn test_parse_csv_empty_body() {
        let rows = parse_csv("latitude,longitude\n").unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_execute_rejects_out_of_range_coordinates() {
        let context = test_context();
        let result = FirmsTool::execute(
            &context,
            FirmsParams {
                latitude: 95.0,
                longitude: 0.0,
                days: 1,
            },
        )
        .await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_execute_without_api_key_is_error_envelope() {
        let context = test_context();
        let result = FirmsTool::execute(&context, params()).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("NASA_API_KEY"));
    }
}
