//! NASA Image and Video Library search.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, json_result, push_param,
};

const IMAGES_SEARCH_URL: &str = "https://images-api.nasa.gov/search";

/// Media type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

impl MediaType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

/// Parameters for the image library tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ImagesParams {
    /// Free-text search query.
    #[schemars(description = "Search query, e.g. 'Apollo 11'")]
    pub q: String,

    /// Restrict results to a media type.
    #[schemars(description = "Media type filter: 'image', 'video', or 'audio'")]
    #[serde(default)]
    pub media_type: Option<MediaType>,

    /// Earliest year to include.
    #[schemars(description = "Earliest year to include (YYYY)")]
    #[serde(default)]
    pub year_start: Option<String>,

    /// Latest year to include.
    #[schemars(description = "Latest year to include (YYYY)")]
    #[serde(default)]
    pub year_end: Option<String>,

    /// Result page.
    #[schemars(description = "Result page number")]
    #[serde(default)]
    pub page: Option<u32>,
}

/// Image and Video Library tool implementation.
pub struct ImagesTool;

#[async_trait]
impl ToolDefinition for ImagesTool {
    const NAME: &'static str = "nasa/images";
    const DESCRIPTION: &'static str = "Search the NASA Image and Video Library for photos, \
        videos, and audio.";
    type Params = ImagesParams;

    async fn execute(context: &ToolContext, params: ImagesParams) -> CallToolResult {
        info!("Searching NASA image library for '{}'", params.q);

        let query = build_query(&params);
        match context.client.get_json(IMAGES_SEARCH_URL, &query).await {
            Ok(body) => json_result(&body),
            Err(e) => gateway_error(e),
        }
    }
}

fn build_query(params: &ImagesParams) -> Vec<(&'static str, String)> {
    let mut query = vec![("q", params.q.clone())];
    push_param(&mut query, "media_type", params.media_type.map(MediaType::as_str));
    push_param(&mut query, "year_start", params.year_start.as_ref());
    push_param(&mut query, "year_end", params.year_end.as_ref());
    push_param(&mut query, "page", params.page);
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_require_query() {
        assert!(serde_json::from_str::<ImagesParams>("{}").is_err());
    }

    #[test]
    fn test_build_query_with_filters() {
        let params = ImagesParams {
            q: "Apollo 11".to_string(),
            media_type: Some(MediaType::Image),
            year_start: Some("1969".to_string()),
            year_end: None,
            page: Some(2),
        };
        let query = build_query(&params);
        assert!(query.contains(&("q", "Apollo 11".to_string())));
        assert!(query.contains(&("media_type", "image".to_string())));
        assert!(query.contains(&("year_start", "1969".to_string())));
        assert!(query.contains(&("page", "2".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "year_end"));
    }
}
