//! Support ticket prompt definition.

use super::{PromptDefinition, argument};
use rmcp::model::PromptArgument;

/// Read a conversation and log the issue in the CRM.
pub struct SupportTicketPrompt;

impl PromptDefinition for SupportTicketPrompt {
    const NAME: &'static str = "support_ticket_workflow";
    const TITLE: &'static str = "Support Ticket Workflow";
    const DESCRIPTION: &'static str = "Retrieve conversation history and create a CRM entry.";

    fn template() -> &'static str {
        "I need to handle a support ticket for conversation {{conversation_id}}. \
         First, retrieve the messages using 'conversations_get_conversations_id_messages'. \
         Then, summarize the issue and use 'crm_post_crm_entries' to log it."
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![argument(
            "conversation_id",
            "The ID of the conversation to summarize",
            true,
        )]
    }
}
