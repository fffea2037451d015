//! HTTP gateway to the upstream NASA and JPL APIs.
//!
//! All tool handlers go through the [`ApiClient`] defined here. It owns a
//! shared `reqwest` client with a default timeout, attaches the NASA API key
//! where api.nasa.gov requires one, and normalizes failures into the
//! [`GatewayError`] taxonomy (missing key, upstream non-2xx, network failure,
//! undecodable body).

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::config::Config;

/// Base URL for api.nasa.gov endpoints (APOD, NeoWs, DONKI, Mars Rover, FIRMS key reuse).
pub const NASA_API_BASE: &str = "https://api.nasa.gov";

/// Base URL for the JPL Solar System Dynamics APIs (SBDB, Fireball, Scout, CAD).
pub const JPL_SSD_BASE: &str = "https://ssd-api.jpl.nasa.gov";

/// Result type for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur when talking to an upstream API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No NASA API key is configured but the endpoint requires one.
    #[error(
        "NASA_API_KEY is not configured. Set the NASA_API_KEY environment \
         variable (get a free key at https://api.nasa.gov)"
    )]
    MissingApiKey,

    /// The upstream API answered with a non-success status code.
    #[error("Upstream API error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    /// No response was received (connection failure, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Invalid upstream response: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client initialization failed: {0}")]
    Init(String),
}

impl GatewayError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Shared HTTP client for all upstream API calls.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl ApiClient {
    /// Build the client from configuration.
    pub fn new(config: &Config) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Init(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.credentials.nasa_api_key.clone(),
        })
    }

    /// GET a JSON document from an api.nasa.gov endpoint, attaching the API key.
    pub async fn nasa_get(&self, path: &str, query: &[(&str, String)]) -> GatewayResult<Value> {
        let key = self.api_key.clone().ok_or(GatewayError::MissingApiKey)?;
        let url = format!("{NASA_API_BASE}{path}");
        debug!("GET {} ({} params)", url, query.len());
        let request = self.http.get(&url).query(query).query(&[("api_key", key)]);
        Self::json_response(request).await
    }

    /// GET a JSON document from a JPL SSD endpoint. These APIs are keyless.
    pub async fn jpl_get(&self, path: &str, query: &[(&str, String)]) -> GatewayResult<Value> {
        self.get_json(&format!("{JPL_SSD_BASE}{path}"), query).await
    }

    /// GET a JSON document from an arbitrary URL.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> GatewayResult<Value> {
        debug!("GET {}", url);
        Self::json_response(self.http.get(url).query(query)).await
    }

    /// GET a JSON document with a per-request timeout override.
    pub async fn get_json_timeout(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> GatewayResult<Value> {
        debug!("GET {} (timeout {:?})", url, timeout);
        Self::json_response(self.http.get(url).query(query).timeout(timeout)).await
    }

    /// GET a JSON document with an extra request header.
    pub async fn get_json_with_header(
        &self,
        url: &str,
        query: &[(&str, String)],
        header: (&str, &str),
    ) -> GatewayResult<Value> {
        debug!("GET {} ({}: {})", url, header.0, header.1);
        Self::json_response(self.http.get(url).query(query).header(header.0, header.1)).await
    }

    /// GET a plain-text body (used for CSV endpoints).
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> GatewayResult<String> {
        debug!("GET {} (text)", url);
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;
        Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(GatewayError::from_reqwest)
    }

    /// GET a binary body plus its content type (used for imagery endpoints).
    pub async fn get_bytes(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> GatewayResult<(Vec<u8>, Option<String>)> {
        debug!("GET {} (bytes, timeout {:?})", url, timeout);
        let response = self
            .http
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;
        let response = Self::check_status(response).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response
            .bytes()
            .await
            .map_err(GatewayError::from_reqwest)?
            .to_vec();
        Ok((bytes, content_type))
    }

    async fn json_response(request: reqwest::RequestBuilder) -> GatewayResult<Value> {
        let response = request.send().await.map_err(GatewayError::from_reqwest)?;
        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(GatewayError::from_reqwest)
    }

    async fn check_status(response: reqwest::Response) -> GatewayResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        // Keep error payloads bounded; some APIs return full HTML error pages.
        let body: String = if body.len() > 1000 {
            body.chars().take(1000).collect()
        } else {
            body
        };
        warn!("Upstream returned HTTP {}: {}", status, body);
        Err(GatewayError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_without_key() -> ApiClient {
        let config = Config::default();
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_nasa_get_requires_api_key() {
        let client = client_without_key();
        let result = client.nasa_get("/planetary/apod", &[]).await;
        match result {
            Err(GatewayError::MissingApiKey) => {}
            other => panic!("expected MissingApiKey, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_key_message_names_variable() {
        let msg = GatewayError::MissingApiKey.to_string();
        assert!(msg.contains("NASA_API_KEY"));
    }

    #[test]
    fn test_upstream_error_display() {
        let err = GatewayError::Upstream {
            status: 404,
            body: "not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("not found"));
    }

    // Integration test (requires network, run with: cargo test -- --ignored)
    #[ignore]
    #[tokio::test]
    async fn test_jpl_get_fireball() {
        let client = client_without_key();
        let result = client
            .jpl_get("/fireball.api", &[("limit", "1".to_string())])
            .await;
        assert!(result.is_ok());
    }
}
