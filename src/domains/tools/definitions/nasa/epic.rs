//! NASA EPIC - Earth Polychromatic Imaging Camera on DSCOVR.
//!
//! Imagery is only published for dates the camera actually captured, so a
//! requested date is checked against the collection's available-dates list
//! (short probe timeout) and falls back to the most recent imagery when the
//! date is unavailable, the probe fails, or the reply is empty.

use std::time::Duration;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{ToolDefinition, gateway_error, json_result};

const EPIC_API_BASE: &str = "https://epic.gsfc.nasa.gov/api";
const EPIC_ARCHIVE_BASE: &str = "https://epic.gsfc.nasa.gov/archive";

/// Probe of the available-dates index; kept short so a slow index doesn't
/// stall the whole call.
const AVAILABLE_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// The imagery endpoint itself can be slow; bounded rather than unbounded.
const IMAGERY_TIMEOUT: Duration = Duration::from_secs(30);

/// EPIC image collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EpicCollection {
    #[default]
    Natural,
    Enhanced,
}

impl EpicCollection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Enhanced => "enhanced",
        }
    }
}

/// Parameters for the EPIC tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct EpicParams {
    /// Image collection to query.
    #[schemars(description = "Image collection: 'natural' or 'enhanced'")]
    #[serde(default)]
    pub collection: EpicCollection,

    /// Date of the imagery.
    #[schemars(description = "Date of the imagery (YYYY-MM-DD). Defaults to the most recent")]
    #[serde(default)]
    pub date: Option<String>,
}

/// EPIC tool implementation.
pub struct EpicTool;

#[async_trait]
impl ToolDefinition for EpicTool {
    const NAME: &'static str = "nasa/epic";
    const DESCRIPTION: &'static str = "View whole-Earth imagery from the EPIC camera aboard the \
        DSCOVR satellite. Falls back to the most recent imagery when the requested date has none.";
    type Params = EpicParams;

    async fn execute(context: &ToolContext, params: EpicParams) -> CallToolResult {
        let collection = params.collection.as_str();
        info!("Fetching EPIC imagery ({}, date: {:?})", collection, params.date);

        let mut fallback_note: Option<String> = None;
        let mut use_date = None;

        if let Some(date) = &params.date {
            if date_is_available(context, collection, date).await {
                use_date = Some(date.clone());
            } else {
                fallback_note = Some(format!(
                    "No {collection} imagery for {date}; returning the most recent instead."
                ));
            }
        }

        let url = match &use_date {
            Some(date) => format!("{EPIC_API_BASE}/{collection}/date/{date}"),
            None => format!("{EPIC_API_BASE}/{collection}/images"),
        };
        let mut body = match context
            .client
            .get_json_timeout(&url, &[], IMAGERY_TIMEOUT)
            .await
        {
            Ok(body) => body,
            Err(e) => return gateway_error(e),
        };

        // A date can be listed as available yet return no frames.
        if use_date.is_some() && body.as_array().is_some_and(Vec::is_empty) {
            fallback_note = Some(format!(
                "No {collection} frames for the requested date; returning the most recent instead."
            ));
            body = match context
                .client
                .get_json_timeout(
                    &format!("{EPIC_API_BASE}/{collection}/images"),
                    &[],
                    IMAGERY_TIMEOUT,
                )
                .await
            {
                Ok(body) => body,
                Err(e) => return gateway_error(e),
            };
        }

        json_result(&shape_result(collection, fallback_note, &body))
    }
}

/// Check the available-dates index. Any probe failure counts as unavailable
/// so the call degrades to most-recent imagery instead of erroring out.
async fn date_is_available(context: &ToolContext, collection: &str, date: &str) -> bool {
    let url = format!("{EPIC_API_BASE}/{collection}/available");
    match context
        .client
        .get_json_timeout(&url, &[], AVAILABLE_PROBE_TIMEOUT)
        .await
    {
        Ok(Value::Array(dates)) => dates.iter().any(|d| d.as_str() == Some(date)),
        Ok(_) => false,
        Err(e) => {
            warn!("EPIC availability probe failed: {}", e);
            false
        }
    }
}

fn shape_result(collection: &str, fallback_note: Option<String>, body: &Value) -> Value {
    let empty = Vec::new();
    let frames = body.as_array().unwrap_or(&empty);
    let images: Vec<Value> = frames
        .iter()
        .map(|frame| {
            json!({
                "identifier": frame.get("identifier"),
                "caption": frame.get("caption"),
                "date": frame.get("date"),
                "image_url": image_url(collection, frame),
            })
        })
        .collect();

    let mut result = json!({
        "collection": collection,
        "count": images.len(),
        "images": images,
    });
    if let Some(note) = fallback_note {
        result["note"] = Value::String(note);
    }
    result
}

/// Archive URL for a frame: the date portion of the timestamp selects the
/// directory, the `image` field names the file.
fn image_url(collection: &str, frame: &Value) -> Option<String> {
    let image = frame.get("image").and_then(Value::as_str)?;
    let date = frame.get("date").and_then(Value::as_str)?;
    let day = date.get(..10)?;
    let mut parts = day.split('-');
    let (year, month, dom) = (parts.next()?, parts.next()?, parts.next()?);
    Some(format!(
        "{EPIC_ARCHIVE_BASE}/{collection}/{year}/{month}/{dom}/png/{image}.png"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Value {
        json!({
            "identifier": "20230101001751",
            "caption": "This image was taken by the NASA EPIC camera",
            "image": "epic_1b_20230101001751",
            "date": "2023-01-01 00:13:03"
        })
    }

    #[test]
    fn test_params_default_collection() {
        let params: EpicParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.collection, EpicCollection::Natural);
    }

    #[test]
    fn test_params_enhanced_collection() {
        let params: EpicParams =
            serde_json::from_str(r#"{"collection": "enhanced"}"#).unwrap();
        assert_eq!(params.collection, EpicCollection::Enhanced);
    }

    #[test]
    fn test_params_reject_unknown_collection() {
        let result = serde_json::from_str::<EpicParams>(r#"{"collection": "thermal"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_image_url() {
        let url = image_url("natural", &sample_frame()).unwrap();
        assert_eq!(
            url,
            "https://epic.gsfc.nasa.gov/archive/natural/2023/01/01/png/epic_1b_20230101001751.png"
        );
    }

    #[test]
    fn test_image_url_missing_fields() {
        assert!(image_url("natural", &json!({})).is_none());
    }

    #[test]
    fn test_shape_result_includes_note_on_fallback() {
        let body = Value::Array(vec![sample_frame()]);
        let shaped = shape_result("natural", Some("fell back".to_string()), &body);
        assert_eq!(shaped["count"], 1);
        assert_eq!(shaped["note"], "fell back");
        assert!(shaped["images"][0]["image_url"].as_str().is_some());
    }

    #[test]
    fn test_shape_result_no_note_on_direct_hit() {
        let shaped = shape_result("natural", None, &Value::Array(vec![]));
        assert!(shaped.get("note").is_none());
        assert_eq!(shaped["count"], 0);
    }
}
