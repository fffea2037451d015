//! URI templates for parameterized resources.
//!
//! A template like `nasa://apod/image?date={date}` is parsed into literal
//! segments and named placeholders. Each placeholder compiles to a named
//! regex capture group matching any non-slash text, so extracted values are
//! always associated with placeholders by name rather than position.
//!
//! When several templates could match a URI, resolution is deterministic:
//! candidates are ordered by descending literal-prefix length, with the raw
//! template string as the final tie-break.

use std::collections::HashMap;

use regex::Regex;
use rmcp::model::{AnnotateAble, RawResourceTemplate, ResourceContents, ResourceTemplate};
use serde_json::json;

use super::error::ResourceError;

/// A parsed URI template.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    raw: String,
    regex: Regex,
    placeholders: Vec<String>,
    literal_prefix: String,
}

impl UriTemplate {
    /// Parse a template string.
    ///
    /// Placeholder names must be non-empty, consist of ASCII alphanumerics or
    /// underscores, and be unique within the template.
    pub fn parse(template: &str) -> Result<Self, ResourceError> {
        let mut pattern = String::from("^");
        let mut placeholders: Vec<String> = Vec::new();
        let mut literal_prefix: Option<String> = None;

        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let literal = &rest[..open];
            pattern.push_str(&regex::escape(literal));
            if literal_prefix.is_none() {
                literal_prefix = Some(literal.to_string());
            }

            let close = rest[open..].find('}').ok_or_else(|| {
                ResourceError::invalid_template(format!("unclosed placeholder in '{template}'"))
            })? + open;
            let name = &rest[open + 1..close];

            if name.is_empty()
                || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ResourceError::invalid_template(format!(
                    "invalid placeholder name '{{{name}}}' in '{template}'"
                )));
            }
            if placeholders.iter().any(|p| p == name) {
                return Err(ResourceError::invalid_template(format!(
                    "duplicate placeholder '{{{name}}}' in '{template}'"
                )));
            }

            pattern.push_str(&format!("(?P<{name}>[^/]+)"));
            placeholders.push(name.to_string());
            rest = &rest[close + 1..];
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|e| ResourceError::invalid_template(e.to_string()))?;

        Ok(Self {
            raw: template.to_string(),
            regex,
            placeholders,
            literal_prefix: literal_prefix.unwrap_or_else(|| template.to_string()),
        })
    }

    /// The original template string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The literal text preceding the first placeholder.
    pub fn literal_prefix(&self) -> &str {
        &self.literal_prefix
    }

    /// Match a URI against this template, extracting placeholder values.
    pub fn extract(&self, uri: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(uri)?;
        let mut values = HashMap::new();
        for name in &self.placeholders {
            if let Some(m) = caps.name(name) {
                values.insert(name.clone(), m.as_str().to_string());
            }
        }
        Some(values)
    }
}

/// Generator that materializes a resource for a URI matched by a template.
pub type TemplateGenerator =
    fn(&str, &HashMap<String, String>) -> Result<ResourceContents, ResourceError>;

/// A registered resource template: parsed matcher plus metadata and generator.
pub struct ResourceTemplateDef {
    pub template: UriTemplate,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
    pub generate: TemplateGenerator,
}

impl ResourceTemplateDef {
    /// Convert to the MCP resource-template descriptor.
    pub fn descriptor(&self) -> ResourceTemplate {
        RawResourceTemplate {
            uri_template: self.template.raw().to_string(),
            name: self.name.to_string(),
            title: Some(self.title.to_string()),
            description: Some(self.description.to_string()),
            mime_type: Some(self.mime_type.to_string()),
        }
        .no_annotation()
    }
}

/// Order templates for deterministic resolution: longest literal prefix
/// first, then lexicographic on the raw template.
pub fn sort_for_resolution(defs: &mut [ResourceTemplateDef]) {
    defs.sort_by(|a, b| {
        b.template
            .literal_prefix()
            .len()
            .cmp(&a.template.literal_prefix().len())
            .then_with(|| a.template.raw().cmp(b.template.raw()))
    });
}

/// All registered resource templates.
///
/// Template parsing only fails on malformed template literals, which would be
/// a programming error; malformed entries are skipped rather than panicking.
pub fn all_templates() -> Vec<ResourceTemplateDef> {
    let specs: Vec<(&'static str, &'static str, &'static str, &'static str, &'static str, TemplateGenerator)> = vec![
        (
            "nasa://apod/image?date={date}",
            "APOD Image",
            "Astronomy Picture of the Day",
            "NASA Astronomy Picture of the Day metadata for a specific date",
            "application/json",
            generate_apod,
        ),
        (
            "nasa://epic/image?date={date}&collection={collection}",
            "EPIC Image",
            "Earth Polychromatic Imaging Camera",
            "EPIC Earth imagery for a specific date and collection",
            "application/json",
            generate_epic,
        ),
        (
            "nasa://mars-rover/photo?rover={rover}&id={id}",
            "Mars Rover Photo",
            "Mars Rover Photograph",
            "A single photo taken by a Mars rover",
            "application/json",
            generate_mars_rover,
        ),
        (
            "nasa://images/item?nasa_id={nasa_id}",
            "NASA Image Item",
            "NASA Image and Video Library Item",
            "An item from the NASA Image and Video Library",
            "application/json",
            generate_images_item,
        ),
        (
            "nasa://gibs/imagery?layer={layer}&date={date}",
            "GIBS Imagery",
            "Global Imagery Browse Services",
            "Satellite imagery layer rendered for a specific date",
            "application/json",
            generate_gibs,
        ),
        (
            "jpl://sbdb?object={object}",
            "Small-Body Database Entry",
            "JPL Small-Body Database",
            "Orbital and physical data for a small solar system body",
            "application/json",
            generate_sbdb,
        ),
    ];

    let mut defs: Vec<ResourceTemplateDef> = specs
        .into_iter()
        .filter_map(|(raw, name, title, description, mime_type, generate)| {
            let template = UriTemplate::parse(raw).ok()?;
            Some(ResourceTemplateDef {
                template,
                name,
                title,
                description,
                mime_type,
                generate,
            })
        })
        .collect();
    sort_for_resolution(&mut defs);
    defs
}

fn canned(uri: &str, body: serde_json::Value) -> Result<ResourceContents, ResourceError> {
    let text = serde_json::to_string_pretty(&body)
        .map_err(|e| ResourceError::internal(e.to_string()))?;
    Ok(ResourceContents::text(text, uri))
}

fn generate_apod(uri: &str, values: &HashMap<String, String>) -> Result<ResourceContents, ResourceError> {
    canned(
        uri,
        json!({
            "type": "apod_image",
            "date": values.get("date"),
            "endpoint": "/planetary/apod",
            "note": "Run the nasa/apod tool with this date to fetch the picture and cache its metadata here."
        }),
    )
}

fn generate_epic(uri: &str, values: &HashMap<String, String>) -> Result<ResourceContents, ResourceError> {
    canned(
        uri,
        json!({
            "type": "epic_image",
            "date": values.get("date"),
            "collection": values.get("collection"),
            "note": "Run the nasa/epic tool to fetch imagery for this date and collection."
        }),
    )
}

fn generate_mars_rover(uri: &str, values: &HashMap<String, String>) -> Result<ResourceContents, ResourceError> {
    canned(
        uri,
        json!({
            "type": "mars_rover_photo",
            "rover": values.get("rover"),
            "photo_id": values.get("id"),
            "note": "Run the nasa/mars-rover tool to fetch photos and cache them here."
        }),
    )
}

fn generate_images_item(uri: &str, values: &HashMap<String, String>) -> Result<ResourceContents, ResourceError> {
    canned(
        uri,
        json!({
            "type": "image_item",
            "nasa_id": values.get("nasa_id"),
            "note": "Run the nasa/images tool to search the Image and Video Library."
        }),
    )
}

fn generate_gibs(uri: &str, values: &HashMap<String, String>) -> Result<ResourceContents, ResourceError> {
    canned(
        uri,
        json!({
            "type": "gibs_imagery",
            "layer": values.get("layer"),
            "date": values.get("date"),
            "note": "Run the nasa/gibs tool to render this layer as an image."
        }),
    )
}

fn generate_sbdb(uri: &str, values: &HashMap<String, String>) -> Result<ResourceContents, ResourceError> {
    canned(
        uri,
        json!({
            "type": "sbdb_entry",
            "object": values.get("object"),
            "note": "Run the jpl/sbdb tool to query the Small-Body Database for this object."
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract_single_placeholder() {
        let template = UriTemplate::parse("nasa://apod/image?date={date}").unwrap();
        let values = template
            .extract("nasa://apod/image?date=2023-01-01")
            .unwrap();
        assert_eq!(values.get("date").map(String::as_str), Some("2023-01-01"));
    }

    #[test]
    fn test_parse_extract_multiple_placeholders() {
        let template =
            UriTemplate::parse("nasa://epic/image?date={date}&collection={collection}").unwrap();
        let values = template
            .extract("nasa://epic/image?date=2023-01-01&collection=natural")
            .unwrap();
        assert_eq!(values.get("date").map(String::as_str), Some("2023-01-01"));
        assert_eq!(
            values.get("collection").map(String::as_str),
            Some("natural")
        );
    }

    #[test]
    fn test_placeholder_rejects_slash() {
        let template = UriTemplate::parse("nasa://mars-rover/photo?rover={rover}&id={id}").unwrap();
        assert!(template
            .extract("nasa://mars-rover/photo?rover=a/b&id=1")
            .is_none());
    }

    #[test]
    fn test_non_matching_uri() {
        let template = UriTemplate::parse("nasa://apod/image?date={date}").unwrap();
        assert!(template.extract("nasa://epic/image?date=2023-01-01").is_none());
    }

    #[test]
    fn test_parse_rejects_duplicate_placeholder() {
        assert!(UriTemplate::parse("nasa://x?a={v}&b={v}").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_placeholder() {
        assert!(UriTemplate::parse("nasa://x?a={}").is_err());
    }

    #[test]
    fn test_parse_rejects_unclosed_placeholder() {
        assert!(UriTemplate::parse("nasa://x?a={date").is_err());
    }

    #[test]
    fn test_literal_prefix() {
        let template = UriTemplate::parse("jpl://sbdb?object={object}").unwrap();
        assert_eq!(template.literal_prefix(), "jpl://sbdb?object=");
    }

    #[test]
    fn test_resolution_order_prefers_longer_prefix() {
        let a = UriTemplate::parse("nasa://a/{x}").unwrap();
        let b = UriTemplate::parse("nasa://a/x{y}").unwrap();
        let mut defs = vec![
            ResourceTemplateDef {
                template: a,
                name: "a",
                title: "a",
                description: "a",
                mime_type: "text/plain",
                generate: generate_apod,
            },
            ResourceTemplateDef {
                template: b,
                name: "b",
                title: "b",
                description: "b",
                mime_type: "text/plain",
                generate: generate_apod,
            },
        ];
        sort_for_resolution(&mut defs);
        assert_eq!(defs[0].name, "b");
        // Both match this URI; the more specific template must win.
        assert!(defs[0].template.extract("nasa://a/x1").is_some());
        assert!(defs[1].template.extract("nasa://a/x1").is_some());
    }

    #[test]
    fn test_all_templates_complete() {
        let defs = all_templates();
        assert_eq!(defs.len(), 6);

        let raws: Vec<_> = defs.iter().map(|d| d.template.raw()).collect();
        assert!(raws.contains(&"nasa://apod/image?date={date}"));
        assert!(raws.contains(&"nasa://epic/image?date={date}&collection={collection}"));
        assert!(raws.contains(&"nasa://mars-rover/photo?rover={rover}&id={id}"));
        assert!(raws.contains(&"nasa://images/item?nasa_id={nasa_id}"));
        assert!(raws.contains(&"nasa://gibs/imagery?layer={layer}&date={date}"));
        assert!(raws.contains(&"jpl://sbdb?object={object}"));
    }

    #[test]
    fn test_generator_echoes_placeholder_values() {
        let defs = all_templates();
        let sbdb = defs
            .iter()
            .find(|d| d.template.raw() == "jpl://sbdb?object={object}")
            .unwrap();

        let uri = "jpl://sbdb?object=Ceres";
        let values = sbdb.template.extract(uri).unwrap();
        let contents = (sbdb.generate)(uri, &values).unwrap();
        match contents {
            ResourceContents::TextResourceContents { text, uri: got, .. } => {
                assert_eq!(got, uri);
                assert!(text.contains("Ceres"));
            }
            _ => panic!("expected text contents"),
        }
    }
}
