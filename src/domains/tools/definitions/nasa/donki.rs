//! NASA DONKI - Space Weather Database Of Notifications, Knowledge, Information.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::definitions::common::{
    ToolDefinition, gateway_error, json_result, push_param,
};

/// Space weather event type. Each maps to its own DONKI endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DonkiEventType {
    /// Coronal mass ejection.
    Cme,
    /// CME analysis.
    Cmea,
    /// Geomagnetic storm.
    Gst,
    /// Interplanetary shock.
    Ips,
    /// Solar flare.
    Flr,
    /// Solar energetic particle event.
    Sep,
    /// Magnetopause crossing.
    Mpc,
    /// Radiation belt enhancement.
    Rbe,
    /// High speed stream.
    Hss,
    /// WSA-Enlil simulation.
    Wsa,
    /// Notifications digest.
    Notifications,
}

impl DonkiEventType {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Cme => "/DONKI/CME",
            Self::Cmea => "/DONKI/CMEAnalysis",
            Self::Gst => "/DONKI/GST",
            Self::Ips => "/DONKI/IPS",
            Self::Flr => "/DONKI/FLR",
            Self::Sep => "/DONKI/SEP",
            Self::Mpc => "/DONKI/MPC",
            Self::Rbe => "/DONKI/RBE",
            Self::Hss => "/DONKI/HSS",
            Self::Wsa => "/DONKI/WSAEnlilSimulations",
            Self::Notifications => "/DONKI/notifications",
        }
    }
}

/// Parameters for the DONKI tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DonkiParams {
    /// Event type to query.
    #[schemars(
        description = "Event type: cme, cmea, gst, ips, flr, sep, mpc, rbe, hss, wsa, or notifications"
    )]
    pub r#type: DonkiEventType,

    /// Start of the date range.
    #[schemars(description = "Start date (YYYY-MM-DD). Defaults to 30 days ago")]
    #[serde(default, rename = "startDate")]
    pub start_date: Option<String>,

    /// End of the date range.
    #[schemars(description = "End date (YYYY-MM-DD). Defaults to today")]
    #[serde(default, rename = "endDate")]
    pub end_date: Option<String>,
}

/// DONKI tool implementation.
pub struct DonkiTool;

#[async_trait]
impl ToolDefinition for DonkiTool {
    const NAME: &'static str = "nasa/donki";
    const DESCRIPTION: &'static str = "Query NASA's DONKI space weather database for solar \
        flares, CMEs, geomagnetic storms, and other space weather events.";
    type Params = DonkiParams;

    async fn execute(context: &ToolContext, params: DonkiParams) -> CallToolResult {
        let endpoint = params.r#type.endpoint();
        info!("Fetching DONKI events from {}", endpoint);

        let mut query = Vec::new();
        push_param(&mut query, "startDate", params.start_date.as_ref());
        push_param(&mut query, "endDate", params.end_date.as_ref());

        match context.client.nasa_get(endpoint, &query).await {
            Ok(body) => json_result(&body),
            Err(e) => gateway_error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::test_context;
    use crate::domains::tools::definitions::common::result_text;

    #[test]
    fn test_params_parse_event_type() {
        let params: DonkiParams =
            serde_json::from_str(r#"{"type": "flr", "startDate": "2023-01-01"}"#).unwrap();
        assert_eq!(params.r#type, DonkiEventType::Flr);
        assert_eq!(params.start_date.as_deref(), Some("2023-01-01"));
    }

    #[test]
    fn test_params_reject_unknown_type() {
        assert!(serde_json::from_str::<DonkiParams>(r#"{"type": "aurora"}"#).is_err());
    }

    #[test]
    fn test_endpoint_mapping() {
        assert_eq!(DonkiEventType::Cme.endpoint(), "/DONKI/CME");
        assert_eq!(DonkiEventType::Cmea.endpoint(), "/DONKI/CMEAnalysis");
        assert_eq!(DonkiEventType::Wsa.endpoint(), "/DONKI/WSAEnlilSimulations");
        assert_eq!(DonkiEventType::Notifications.endpoint(), "/DONKI/notifications");
    }

    #[tokio::test]
    async fn test_execute_without_api_key_is_error_envelope() {
        let context = test_context();
        let params = DonkiParams {
            r#type: DonkiEventType::Gst,
            start_date: None,
            end_date: None,
        };
        let result = DonkiTool::execute(&context, params).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("NASA_API_KEY"));
    }
}
