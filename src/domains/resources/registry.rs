//! Resource Registry - process-wide store of resources keyed by URI.
//!
//! Tools register derived resources here as a side effect of execution (for
//! example, each APOD fetch stores the picture metadata under a date-scoped
//! URI). Transports can subscribe to the revision channel to emit
//! `notifications/resources/list_changed` when the set of resources changes.
//!
//! The registry is unbounded for the lifetime of the process: entries are
//! never evicted, and re-registering a URI overwrites the previous payload
//! (last write wins).

use std::collections::HashMap;
use std::sync::RwLock;

use rmcp::model::{AnnotateAble, RawResource, Resource};
use tokio::sync::watch;
use tracing::debug;

/// A resource payload stored in the registry.
#[derive(Debug, Clone)]
pub struct StoredResource {
    /// Human-readable name shown in resource listings.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// MIME type of the content.
    pub mime_type: String,

    /// The resource content.
    pub content: ResourceContent,
}

/// Content held by a stored resource.
#[derive(Debug, Clone)]
pub enum ResourceContent {
    /// Text content (JSON documents, markdown, plain text).
    Text(String),

    /// Binary content, base64-encoded when read.
    Binary(Vec<u8>),
}

impl StoredResource {
    /// Convenience constructor for a text resource.
    pub fn text(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            mime_type: mime_type.into(),
            content: ResourceContent::Text(content.into()),
        }
    }

    /// Convenience constructor for a binary resource.
    pub fn binary(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            mime_type: mime_type.into(),
            content: ResourceContent::Binary(content),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Process-wide resource store.
///
/// Mutations bump a revision counter observable through [`subscribe`]; the
/// HTTP transport forwards revision changes to connected SSE clients as
/// list-changed notifications.
///
/// [`subscribe`]: ResourceRegistry::subscribe
pub struct ResourceRegistry {
    entries: RwLock<HashMap<String, StoredResource>>,
    revision: watch::Sender<u64>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: RwLock::new(HashMap::new()),
            revision,
        }
    }

    /// Insert or overwrite a resource. Last write wins.
    pub fn put(&self, uri: impl Into<String>, resource: StoredResource) {
        let uri = uri.into();
        debug!("Registering resource: {}", uri);
        self.write_entries().insert(uri, resource);
        self.revision.send_modify(|r| *r += 1);
    }

    /// Look up a resource by exact URI.
    pub fn get(&self, uri: &str) -> Option<StoredResource> {
        self.read_entries().get(uri).cloned()
    }

    /// List all registered resources as MCP resource descriptors.
    pub fn list(&self) -> Vec<Resource> {
        self.read_entries()
            .iter()
            .map(|(uri, stored)| {
                let mut raw = RawResource::new(uri.as_str(), stored.name.clone());
                raw.description = stored.description.clone();
                raw.mime_type = Some(stored.mime_type.clone());
                raw.no_annotation()
            })
            .collect()
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Subscribe to registry revisions. The value increases on every `put`.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, StoredResource>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, StoredResource>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get_returns_payload() {
        let registry = ResourceRegistry::new();
        registry.put(
            "nasa://apod/image?date=2023-01-01",
            StoredResource::text("APOD 2023-01-01", "application/json", "{}"),
        );

        let stored = registry.get("nasa://apod/image?date=2023-01-01").unwrap();
        assert_eq!(stored.name, "APOD 2023-01-01");
        assert_eq!(stored.mime_type, "application/json");
    }

    #[test]
    fn test_put_overwrites_last_write_wins() {
        let registry = ResourceRegistry::new();
        registry.put(
            "nasa://neo/list?date=2023-01-01",
            StoredResource::text("first", "application/json", "1"),
        );
        registry.put(
            "nasa://neo/list?date=2023-01-01",
            StoredResource::text("second", "application/json", "2"),
        );

        assert_eq!(registry.len(), 1);
        let stored = registry.get("nasa://neo/list?date=2023-01-01").unwrap();
        assert_eq!(stored.name, "second");
        match stored.content {
            ResourceContent::Text(text) => assert_eq!(text, "2"),
            ResourceContent::Binary(_) => panic!("expected text content"),
        }
    }

    #[test]
    fn test_list_contains_resource_exactly_once() {
        let registry = ResourceRegistry::new();
        registry.put(
            "jpl://sbdb?object=Ceres",
            StoredResource::text("SBDB: Ceres", "application/json", "{}"),
        );

        let listed = registry.list();
        let matching: Vec<_> = listed
            .iter()
            .filter(|r| r.raw.uri == "jpl://sbdb?object=Ceres")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].raw.name, "SBDB: Ceres");
        assert_eq!(matching[0].raw.mime_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_get_unknown_uri_is_none() {
        let registry = ResourceRegistry::new();
        assert!(registry.get("nasa://nothing/here").is_none());
    }

    #[tokio::test]
    async fn test_put_bumps_revision() {
        let registry = ResourceRegistry::new();
        let rx = registry.subscribe();
        assert_eq!(*rx.borrow(), 0);

        registry.put(
            "nasa://apod/image?date=2023-01-02",
            StoredResource::text("APOD", "application/json", "{}"),
        );
        assert_eq!(*rx.borrow(), 1);

        registry.put(
            "nasa://apod/image?date=2023-01-03",
            StoredResource::text("APOD", "application/json", "{}"),
        );
        assert_eq!(*rx.borrow(), 2);
    }
}
