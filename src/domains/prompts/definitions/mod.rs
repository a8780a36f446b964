//! Prompt definitions module.
//!
//! Each prompt is a canned workflow that walks the caller through chaining
//! several API tools. A definition carries:
//! - Metadata (name, title, description, arguments)
//! - Template string naming the tools to call, in order
//!
//! ## Adding a New Prompt
//!
//! 1. Create a new file (e.g., `my_workflow.rs`)
//! 2. Implement the `PromptDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod broadcast_campaign;
mod create_new_agent;
mod onboard_new_user;
mod support_ticket;

pub use broadcast_campaign::BroadcastCampaignPrompt;
pub use create_new_agent::CreateNewAgentPrompt;
pub use onboard_new_user::OnboardNewUserPrompt;
pub use support_ticket::SupportTicketPrompt;

use rmcp::model::PromptArgument;

/// Trait for prompt definitions.
///
/// Each prompt must implement this trait to provide its metadata and template.
pub trait PromptDefinition {
    /// The unique name of the prompt.
    const NAME: &'static str;

    /// Short label, also used as the description of a rendered prompt.
    const TITLE: &'static str;

    /// A description of what the prompt does.
    const DESCRIPTION: &'static str;

    /// The template string with {{variable}} placeholders.
    fn template() -> &'static str;

    /// The arguments this prompt accepts.
    fn arguments() -> Vec<PromptArgument>;
}

/// Shorthand for a prompt argument.
pub(crate) fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}
