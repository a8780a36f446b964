//! Agent creation prompt definition.

use super::{PromptDefinition, argument};
use rmcp::model::PromptArgument;

/// Interactive design of a new agent, ending with its creation.
pub struct CreateNewAgentPrompt;

impl PromptDefinition for CreateNewAgentPrompt {
    const NAME: &'static str = "create_new_agent";
    const TITLE: &'static str = "Agent Creation Workflow";
    const DESCRIPTION: &'static str =
        "Interactive workflow to design, configure, and deploy a new AI agent.";

    fn template() -> &'static str {
        r#"I want to create {{#if agent_name}}{{agent_name}}{{else}}a new agent{{/if}}. Let's go through the steps:
1. Help me define its role and goal (description).
2. Help me draft a comprehensive system prompt.
3. Ask me which LLM model to use (e.g., gpt-4o, claude-3-5-sonnet).
4. Once we have the config, use 'agents_post_agents' to create it."#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![argument("agent_name", "Desired name for the agent", false)]
    }
}
