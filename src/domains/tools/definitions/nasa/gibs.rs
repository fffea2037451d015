//! NASA GIBS - Global Imagery Browse Services.
//!
//! Renders a satellite imagery layer for a date via the WMS GetMap endpoint
//! and returns the image as base64 alongside its metadata.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domains::resources::StoredResource;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{ToolDefinition, gateway_error, json_result};

const GIBS_WMS_URL: &str = "https://gibs.earthdata.nasa.gov/wms/epsg4326/best/wms.cgi";

/// Whole-earth bounding box in EPSG:4326.
const DEFAULT_BBOX: &str = "-90,-180,90,180";
const DEFAULT_WIDTH: u32 = 720;
const DEFAULT_HEIGHT: u32 = 360;

const IMAGERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Output image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GibsFormat {
    #[default]
    Png,
    Jpg,
    Jpeg,
}

impl GibsFormat {
    fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
        }
    }
}

/// Parameters for the GIBS tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GibsParams {
    /// WMS layer identifier.
    #[schemars(description = "Imagery layer, e.g. 'MODIS_Terra_CorrectedReflectance_TrueColor'")]
    pub layer: String,

    /// Date of the imagery.
    #[schemars(description = "Date of the imagery (YYYY-MM-DD)")]
    pub date: String,

    /// Output image format.
    #[schemars(description = "Image format: 'png', 'jpg', or 'jpeg'")]
    #[serde(default)]
    pub format: GibsFormat,
}

/// GIBS tool implementation.
pub struct GibsTool;

#[async_trait]
impl ToolDefinition for GibsTool {
    const NAME: &'static str = "nasa/gibs";
    const DESCRIPTION: &'static str = "Render a NASA GIBS satellite imagery layer for a date as \
        a whole-earth image, returned base64-encoded.";
    type Params = GibsParams;

    async fn execute(context: &ToolContext, params: GibsParams) -> CallToolResult {
        info!("Rendering GIBS layer {} for {}", params.layer, params.date);

        let query = build_query(&params);
        let (bytes, content_type) = match context
            .client
            .get_bytes(GIBS_WMS_URL, &query, IMAGERY_TIMEOUT)
            .await
        {
            Ok(response) => response,
            Err(e) => return gateway_error(e),
        };

        let content_type = content_type.unwrap_or_else(|| params.format.mime_type().to_string());
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

        context.resources.put(
            format!("nasa://gibs/imagery?layer={}&date={}", params.layer, params.date),
            StoredResource::binary(
                format!("GIBS: {} ({})", params.layer, params.date),
                content_type.clone(),
                bytes,
            ),
        );

        json_result(&json!({
            "layer": params.layer,
            "date": params.date,
            "contentType": content_type,
            "imageData": encoded,
        }))
    }
}

fn build_query(params: &GibsParams) -> Vec<(&'static str, String)> {
    vec![
        ("SERVICE", "WMS".to_string()),
        ("VERSION", "1.3.0".to_string()),
        ("REQUEST", "GetMap".to_string()),
        ("LAYERS", params.layer.clone()),
        ("TIME", params.date.clone()),
        ("FORMAT", params.format.mime_type().to_string()),
        ("CRS", "EPSG:4326".to_string()),
        ("BBOX", DEFAULT_BBOX.to_string()),
        ("WIDTH", DEFAULT_WIDTH.to_string()),
        ("HEIGHT", DEFAULT_HEIGHT.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GibsParams {
        GibsParams {
            layer: "MODIS_Terra_CorrectedReflectance_TrueColor".to_string(),
            date: "2023-01-01".to_string(),
            format: GibsFormat::default(),
        }
    }

    #[test]
    fn test_params_require_layer_and_date() {
        assert!(serde_json::from_str::<GibsParams>("{}").is_err());
        let parsed: GibsParams =
            serde_json::from_str(r#"{"layer": "x", "date": "2023-01-01"}"#).unwrap();
        assert_eq!(parsed.format, GibsFormat::Png);
    }

    #[test]
    fn test_build_query_wms_contract() {
        let query = build_query(&params());
        let get = |k: &str| {
            query
                .iter()
                .find(|(key, _)| *key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("SERVICE"), Some("WMS"));
        assert_eq!(get("VERSION"), Some("1.3.0"));
        assert_eq!(get("REQUEST"), Some("GetMap"));
        assert_eq!(get("FORMAT"), Some("image/png"));
        assert_eq!(get("CRS"), Some("EPSG:4326"));
        assert_eq!(get("TIME"), Some("2023-01-01"));
    }

    #[test]
    fn test_jpg_mime_type() {
        assert_eq!(GibsFormat::Jpg.mime_type(), "image/jpeg");
        assert_eq!(GibsFormat::Jpeg.mime_type(), "image/jpeg");
    }
}
