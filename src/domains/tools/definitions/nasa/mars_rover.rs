//! NASA Mars Rover Photos.
//!
//! Fetches photos taken by a rover on a Martian sol or Earth date, renders a
//! short summary, and caches each photo as a resource.

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

/// Sol used when neither a sol nor an Earth date is given.
const DEFAULT_SOL: u32 = 1000;

/// Photos listed in the summary (all photos are still cached as resources).
const SUMMARY_PHOTO_LIMIT: usize = 5;

/// Mars rover selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Rover {
    Curiosity,
    Opportunity,
    Perseverance,
    Spirit,
}

impl Rover {
    fn as_str(self) -> &'static str {
        match self {
            Self::Curiosity => "curiosity",
            Self::Opportunity => "opportunity",
            Self::Perseverance => "perseverance",
            Self::Spirit => "spirit",
        }
    }
}

/// Parameters for the Mars rover tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MarsRoverParams {
    /// Which rover's photos to fetch.
    #[schemars(description = "Rover: curiosity, opportunity, perseverance, or spirit")]
    pub rover: Rover,

    /// Martian sol of the mission.
    #[schemars(description = "Martian sol (mission day). Defaults to 1000 when no date is given")]
    #[serde(default)]
    pub sol: Option<u32>,

    /// Earth date of the photos.
    #[schemars(description = "Earth date of the photos (YYYY-MM-DD); alternative to sol")]
    #[serde(default)]
    pub earth_date: Option<String>,

    /// Camera abbreviation filter.
    #[schemars(description = "Camera filter, e.g. 'NAVCAM' or 'MAST'")]
    #[serde(default)]
    pub camera: Option<String>,

    /// Result page (25 photos per page).
    #[schemars(description = "Result page number")]
    #[serde(default)]
    pub page: Option<u32>,
}

/// Mars rover photos tool implementation.
pub struct MarsRoverTool;

#[async_trait]
impl ToolDefinition for MarsRoverTool {
    const NAME: &'static str = "nasa/mars-rover";
    const DESCRIPTION: &'static str = "Browse photos taken by NASA's Mars rovers, selected by \
        sol or Earth date and optionally by camera.";
    type Params = MarsRoverParams;

    async fn execute(context: &ToolContext, params: MarsRoverParams) -> CallToolResult {
        let rover = params.rover.as_str();
        info!("Fetching {} photos (sol: {:?}, earth_date: {:?})", rover, params.sol, params.earth_date);

        let path = format!("/mars-photos/api/v1/rovers/{rover}/photos");
        let query = build_query(&params);
        let body = match context.client.nasa_get(&path, &query).await {
            Ok(body) => body,
            Err(e) => return gateway_error(e),
        };

        let empty = Vec::new();
        let photos = body
            .get("photos")
            .and_then(Value::as_array)
            .unwrap_or(&empty);
        cache_photos(context, rover, photos);
        success_result(summarize(rover, photos))
    }
}

fn build_query(params: &MarsRoverParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    match (&params.sol, &params.earth_date) {
        (Some(sol), _) => query.push(("sol", sol.to_string())),
        (None, Some(date)) => query.push(("earth_date", date.clone())),
        (None, None) => query.push(("sol", DEFAULT_SOL.to_string())),
    }
    push_param(&mut query, "camera", params.camera.as_ref());
    push_param(&mut query, "page", params.page);
    query
}

fn summarize(rover: &str, photos: &[Value]) -> String {
    let mut summary = format!("# Mars Rover Photos: {rover}\n\n{} photo(s) found.\n", photos.len());
    for photo in photos.iter().take(SUMMARY_PHOTO_LIMIT) {
        let id = photo.get("id").and_then(Value::as_u64).unwrap_or(0);
        let camera = photo
            .pointer("/camera/full_name")
            .and_then(Value::as_str)
            .unwrap_or("unknown camera");
        let date = photo
            .get("earth_date")
            .and_then(Value::as_str)
            .unwrap_or("unknown date");
        summary.push_str(&format!("\n- Photo {id} ({camera}, {date})"));
        if let Some(url) = photo.get("img_src").and_then(Value::as_str) {
            summary.push_str(&format!("\n  {url}"));
        }
    }
    if photos.len() > SUMMARY_PHOTO_LIMIT {
        summary.push_str(&format!(
            "\n\n...and {} more, cached as resources.",
            photos.len() - SUMMARY_PHOTO_LIMIT
        ));
    }
    summary
}

fn cache_photos(context: &ToolContext, rover: &str, photos: &[Value]) {
    for photo in photos {
        let Some(id) = photo.get("id").and_then(Value::as_u64) else {
            continue;
        };
        let text = serde_json::to_string_pretty(photo).unwrap_or_else(|_| photo.to_string());
        context.resources.put(
            format!("nasa://mars-rover/photo?rover={rover}&id={id}"),
            StoredResource::text(
                format!("Mars Rover Photo {id} ({rover})"),
                "application/json",
                text,
            ),
        );
    }
}
