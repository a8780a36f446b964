//! Onboarding prompt definition.

use super::{PromptDefinition, argument};
use rmcp::model::PromptArgument;

/// Create a contact, then send it a welcome message.
pub struct OnboardNewUserPrompt;

impl PromptDefinition for OnboardNewUserPrompt {
    const NAME: &'static str = "onboard_new_user";
    const TITLE: &'static str = "Onboarding Workflow";
    const DESCRIPTION: &'static str =
        "A guide to creating a contact and sending a welcome message.";

    fn template() -> &'static str {
        "I want to onboard a new user named {{first_name}} with phone {{phone_number}}. \
         Please first use the 'contacts_post_contacts' tool to create the contact, \
         then ask me for a message template to send via \
         'whatsapp_post_zapi_instanceId_contactPhone_message'."
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument("first_name", "Contact's first name", true),
            argument("phone_number", "Contact's phone number", true),
        ]
    }
}
