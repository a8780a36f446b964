//! Broadcast campaign prompt definition.

use super::{PromptDefinition, argument};
use rmcp::model::PromptArgument;

/// Pick contacts, then create a dispatch for them.
pub struct BroadcastCampaignPrompt;

impl PromptDefinition for BroadcastCampaignPrompt {
    const NAME: &'static str = "broadcast_campaign";
    const TITLE: &'static str = "Broadcast Campaign Workflow";
    const DESCRIPTION: &'static str = "Setup a dispatch for a list of contacts.";

    fn template() -> &'static str {
        "Let's set up the broadcast campaign '{{campaign_name}}'. \
         I'll need to filter contacts first using 'contacts_get_contacts'. \
         After I confirm the list, we will create a dispatch using 'dispatches_post_dispatches'."
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![argument("campaign_name", "Name of the campaign", true)]
    }
}
