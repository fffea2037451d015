//! Prompt service implementation.
//!
//! The PromptService answers prompt listing and instantiation requests from
//! the static catalog in `registry.rs`, validating required arguments before
//! rendering.

use std::collections::HashMap;

use rmcp::model::{GetPromptResult, Prompt, PromptArgument, PromptMessage, PromptMessageRole};
use tracing::info;

use super::error::PromptError;
use super::registry::{PromptSpec, all_prompts};

/// Service for managing and instantiating prompts.
pub struct PromptService;

impl PromptService {
    /// Create a new PromptService.
    pub fn new() -> Self {
        info!("Initializing PromptService ({} prompts)", all_prompts().len());
        Self
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        all_prompts()
            .iter()
            .map(|spec| Prompt {
                name: spec.name.to_string(),
                title: None,
                description: Some(spec.description.to_string()),
                arguments: Some(
                    spec.arguments
                        .iter()
                        .map(|arg| PromptArgument {
                            name: arg.name.to_string(),
                            title: None,
                            description: Some(arg.description.to_string()),
                            required: Some(arg.required),
                        })
                        .collect(),
                ),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Get a prompt rendered with the supplied arguments.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let spec = Self::find(name)?;
        let arguments = arguments.unwrap_or_default();
        Self::validate_arguments(spec, &arguments)?;

        let content = (spec.render)(&arguments);
        Ok(GetPromptResult {
            description: Some(spec.description.to_string()),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }

    /// Resolve the prompt a `prompts/execute` invocation names, validating
    /// its arguments.
    ///
    /// The returned spec carries the mapped tool and the argument renames to
    /// apply before dispatching to it.
    pub fn resolve_tool(
        &self,
        name: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<&'static PromptSpec, PromptError> {
        let spec = Self::find(name)?;
        Self::validate_arguments(spec, arguments)?;
        Ok(spec)
    }

    fn find(name: &str) -> Result<&'static PromptSpec, PromptError> {
        all_prompts()
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| PromptError::not_found(name))
    }

    fn validate_arguments(
        spec: &PromptSpec,
        arguments: &HashMap<String, String>,
    ) -> Result<(), PromptError> {
        for arg in spec.arguments {
            if arg.required && !arguments.contains_key(arg.name) {
                return Err(PromptError::missing_argument(arg.name));
            }
        }
        Ok(())
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_prompts() {
        let service = PromptService::new();
        let prompts = service.list_prompts().await;
        assert_eq!(prompts.len(), 6);

        let neo = prompts
            .iter()
            .find(|p| p.name == "nasa/browse-near-earth-objects")
            .unwrap();
        let args = neo.arguments.as_ref().unwrap();
        let start = args.iter().find(|a| a.name == "start_date").unwrap();
        assert_eq!(start.required, Some(true));
    }

    #[tokio::test]
    async fn test_get_prompt_with_arguments() {
        let service = PromptService::new();

        let mut args = HashMap::new();
        args.insert("object".to_string(), "Ceres".to_string());

        let result = service
            .get_prompt("jpl/query-small-body-database", Some(args))
            .await
            .unwrap();
        assert_eq!(result.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_get_prompt_missing_required_argument() {
        let service = PromptService::new();
        let result = service.get_prompt("jpl/query-small-body-database", None).await;
        assert!(matches!(result, Err(PromptError::MissingArgument(_))));
    }

    #[tokio::test]
    async fn test_get_nonexistent_prompt() {
        let service = PromptService::new();
        let result = service.get_prompt("nasa/nonexistent", None).await;
        assert!(matches!(result, Err(PromptError::NotFound(_))));
    }

    #[test]
    fn test_resolve_tool_mapping() {
        let service = PromptService::new();
        let mut args = HashMap::new();
        args.insert("date".to_string(), "2023-01-01".to_string());

        let spec = service
            .resolve_tool("nasa/get-astronomy-picture", &args)
            .unwrap();
        assert_eq!(spec.tool, "nasa/apod");
    }

    #[test]
    fn test_resolve_tool_validates_arguments() {
        let service = PromptService::new();
        let result = service.resolve_tool("nasa/browse-near-earth-objects", &HashMap::new());
        assert!(matches!(result, Err(PromptError::MissingArgument(_))));
    }
}
