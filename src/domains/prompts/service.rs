//! Prompt service implementation.
//!
//! The PromptService lists the workflow prompts and renders one on request.
//! Prompts are defined in `definitions/` and registered via `registry.rs`.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;

/// Service for listing and rendering workflow prompts.
pub struct PromptService {
    /// Key: prompt name, Value: prompt template
    prompts: BTreeMap<String, PromptTemplate>,
}

impl PromptService {
    /// Create a PromptService holding every registered workflow.
    pub fn new() -> Self {
        let mut service = Self {
            prompts: BTreeMap::new(),
        };

        for template in get_all_prompts() {
            service.register_prompt(template);
        }
        info!("PromptService ready with {} prompts", service.prompts.len());

        service
    }

    /// Register a prompt template.
    pub fn register_prompt(&mut self, template: PromptTemplate) {
        debug!("Registering prompt: {}", template.name);
        self.prompts.insert(template.name.clone(), template);
    }

    /// List all available prompts, sorted by name.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .values()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: template.title.clone(),
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Render a prompt into a single user message.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .get(name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let arguments = arguments.unwrap_or_default();

        if let Some(missing) = template
            .required_arguments()
            .find(|arg| !arguments.contains_key(*arg))
        {
            return Err(PromptError::missing_argument(missing));
        }

        let content = template.render(&arguments)?;

        Ok(GetPromptResult {
            description: template.title.clone().or_else(|| template.description.clone()),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}
