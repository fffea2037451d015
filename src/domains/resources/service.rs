//! Resource service implementation.
//!
//! The ResourceService answers resource listing and read requests. Concrete
//! resources live in the shared [`ResourceRegistry`]; URIs that match a
//! registered template are materialized on demand by the template's
//! generator. Registry entries always win over templates.

use std::sync::Arc;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use serde_json::json;
use tracing::{debug, info};

use super::error::ResourceError;
use super::registry::{ResourceContent, ResourceRegistry, StoredResource};
use super::templates::{ResourceTemplateDef, all_templates};

/// Service for managing and accessing resources.
pub struct ResourceService {
    /// Shared registry of concrete resources.
    registry: Arc<ResourceRegistry>,

    /// Resource templates, pre-sorted for deterministic resolution.
    templates: Vec<ResourceTemplateDef>,
}

impl ResourceService {
    /// Create a new ResourceService over the shared registry.
    pub fn new(registry: Arc<ResourceRegistry>) -> Self {
        info!("Initializing ResourceService");

        let service = Self {
            registry,
            templates: all_templates(),
        };
        service.seed_examples();
        service
    }

    /// Seed a few example resources so clients have something to discover
    /// before any tool has run.
    fn seed_examples(&self) {
        let seeds = [
            (
                "nasa://apod/image?date=2023-01-01",
                StoredResource::text(
                    "Astronomy Picture of the Day (2023-01-01)",
                    "application/json",
                    pretty(json!({
                        "type": "apod_image",
                        "date": "2023-01-01",
                        "note": "Example resource. Run the nasa/apod tool to replace it with live data."
                    })),
                )
                .with_description("Example APOD entry"),
            ),
            (
                "nasa://epic/image?date=2023-01-01&collection=natural",
                StoredResource::text(
                    "EPIC Earth Imagery (2023-01-01, natural)",
                    "application/json",
                    pretty(json!({
                        "type": "epic_image",
                        "date": "2023-01-01",
                        "collection": "natural",
                        "note": "Example resource. Run the nasa/epic tool to replace it with live data."
                    })),
                )
                .with_description("Example EPIC entry"),
            ),
            (
                "nasa://neo/list?date=2023-01-01",
                StoredResource::text(
                    "Near-Earth Objects (2023-01-01)",
                    "application/json",
                    pretty(json!({
                        "type": "neo_list",
                        "date": "2023-01-01",
                        "note": "Example resource. Run the nasa/neo tool to replace it with live data."
                    })),
                )
                .with_description("Example NEO feed entry"),
            ),
        ];

        for (uri, resource) in seeds {
            self.registry.put(uri, resource);
        }
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.registry.list()
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.iter().map(|t| t.descriptor()).collect()
    }

    /// Read a resource by URI.
    ///
    /// Resolution order: exact registry entry first, then the most specific
    /// matching template.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        if let Some(stored) = self.registry.get(uri) {
            let content = match &stored.content {
                ResourceContent::Text(text) => ResourceContents::text(text, uri),
                ResourceContent::Binary(data) => ResourceContents::BlobResourceContents {
                    uri: uri.to_string(),
                    mime_type: Some(stored.mime_type.clone()),
                    blob: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, data),
                    meta: None,
                },
            };
            return Ok(ReadResourceResult {
                contents: vec![content],
            });
        }

        for def in &self.templates {
            if let Some(values) = def.template.extract(uri) {
                debug!("Resolved {} via template {}", uri, def.template.raw());
                let content = (def.generate)(uri, &values)?;
                return Ok(ReadResourceResult {
                    contents: vec![content],
                });
            }
        }

        Err(ResourceError::not_found(uri))
    }
}

fn pretty(value: serde_json::Value) -> String {
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ResourceService {
        ResourceService::new(Arc::new(ResourceRegistry::new()))
    }

    #[tokio::test]
    async fn test_service_seeds_example_resources() {
        let service = service();
        let resources = service.list_resources().await;
        assert_eq!(resources.len(), 3);

        let uris: Vec<_> = resources.iter().map(|r| r.raw.uri.as_str()).collect();
        assert!(uris.contains(&"nasa://apod/image?date=2023-01-01"));
        assert!(uris.contains(&"nasa://epic/image?date=2023-01-01&collection=natural"));
        assert!(uris.contains(&"nasa://neo/list?date=2023-01-01"));
    }

    #[tokio::test]
    async fn test_read_registry_entry() {
        let service = service();
        let result = service
            .read_resource("nasa://apod/image?date=2023-01-01")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_read_via_template() {
        let service = service();
        // Not seeded, but matches the APOD template.
        let result = service
            .read_resource("nasa://apod/image?date=2024-06-15")
            .await
            .unwrap();
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => {
                assert!(text.contains("2024-06-15"));
            }
            _ => panic!("expected text contents"),
        }
    }

    #[tokio::test]
    async fn test_registry_entry_wins_over_template() {
        let registry = Arc::new(ResourceRegistry::new());
        let service = ResourceService::new(registry.clone());
        registry.put(
            "nasa://apod/image?date=2024-06-15",
            StoredResource::text("cached", "application/json", "{\"cached\": true}"),
        );

        let result = service
            .read_resource("nasa://apod/image?date=2024-06-15")
            .await
            .unwrap();
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => {
                assert!(text.contains("cached"));
            }
            _ => panic!("expected text contents"),
        }
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let service = service();
        let result = service.read_resource("nasa://unknown/thing").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_templates() {
        let service = service();
        let templates = service.list_resource_templates().await;
        assert_eq!(templates.len(), 6);
    }
}
