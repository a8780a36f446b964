//! Prompt Registry - central registration of all prompts.
//!
//! When adding a new prompt:
//! 1. Create the prompt file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_prompts()` and `prompt_names()`

use super::definitions::{
    BroadcastCampaignPrompt, CreateNewAgentPrompt, OnboardNewUserPrompt, PromptDefinition,
    SupportTicketPrompt,
};
use super::templates::PromptTemplate;

/// Build a PromptTemplate from a PromptDefinition.
fn build_template<P: PromptDefinition>() -> PromptTemplate {
    PromptTemplate {
        name: P::NAME.to_string(),
        title: Some(P::TITLE.to_string()),
        description: Some(P::DESCRIPTION.to_string()),
        arguments: P::arguments(),
        template: P::template().to_string(),
    }
}

/// Get all registered prompts as PromptTemplates.
pub fn get_all_prompts() -> Vec<PromptTemplate> {
    vec![
        build_template::<OnboardNewUserPrompt>(),
        build_template::<SupportTicketPrompt>(),
        build_template::<BroadcastCampaignPrompt>(),
        build_template::<CreateNewAgentPrompt>(),
    ]
}

/// Get the list of all prompt names.
pub fn prompt_names() -> Vec<&'static str> {
    vec![
        OnboardNewUserPrompt::NAME,
        SupportTicketPrompt::NAME,
        BroadcastCampaignPrompt::NAME,
        CreateNewAgentPrompt::NAME,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::catalog::{OpenApiCatalog, ToolCatalog};
    use serde_json::json;

    #[test]
    fn test_registry_matches_names() {
        let prompts = get_all_prompts();
        let names = prompt_names();
        assert_eq!(prompts.len(), 4);

        for (prompt, name) in prompts.iter().zip(names) {
            assert_eq!(prompt.name, name);
            assert!(prompt.title.is_some());
        }
    }

    /// Quoted identifiers in a template, e.g. `'crm_post_crm_entries'`.
    fn quoted_tool_names(template: &str) -> Vec<String> {
        let pattern = regex::Regex::new(r"'([A-Za-z][A-Za-z0-9]*_[A-Za-z0-9_]+)'").unwrap();
        pattern
            .captures_iter(template)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// API-description documents for the services the workflows use.
    fn workflow_catalog() -> OpenApiCatalog {
        let op = || json!({"summary": "operation"});
        let documents = [
            ("agents", json!({"paths": {"/agents": {"post": op()}}})),
            (
                "contacts",
                json!({"paths": {"/contacts": {"get": op(), "post": op()}}}),
            ),
            (
                "conversations",
                json!({"paths": {"/conversations/{id}/messages": {"get": op()}}}),
            ),
            ("crm", json!({"paths": {"/crm/entries": {"post": op()}}})),
            ("dispatches", json!({"paths": {"/dispatches": {"post": op()}}})),
            (
                "whatsapp",
                json!({"paths": {"/zapi/{instanceId}/{contactPhone}/message": {"post": op()}}}),
            ),
        ];
        OpenApiCatalog::from_documents(documents.iter().map(|(s, d)| (*s, d))).unwrap()
    }

    #[test]
    fn test_every_named_tool_exists_in_catalog() {
        let catalog = workflow_catalog();

        for prompt in get_all_prompts() {
            let names = quoted_tool_names(&prompt.template);
            assert!(!names.is_empty(), "{} references no tool", prompt.name);
            for name in names {
                assert!(
                    catalog.lookup(&name).is_some(),
                    "{} names unknown tool {}",
                    prompt.name,
                    name
                );
            }
        }
    }
}
