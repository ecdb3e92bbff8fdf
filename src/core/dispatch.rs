//! Decides whether an inbound Slack event is owed a reply.
//!
//! Rules are evaluated in order and the first match wins:
//! 1. `app_mention` events always get a reply.
//! 2. Any message in a 1:1 DM (`channel_type == "im"`) gets a reply.
//! 3. A message in a multi-person DM (`mpim`) gets a reply only when it
//!    mentions the bot.
//!
//! Events written by a bot (including this one), and the bot-message, edit
//! and deletion subtypes, are ignored before the rules run, otherwise the
//! bot's own DM replies would trigger new replies. Other subtypes such as
//! `file_share` come from users and go through the rules.

use tracing::debug;

use crate::core::models::{DispatchDecision, ReplyRequest, SlackEvent};
use crate::prompt::{extract_prompt, mention_token};

const APP_MENTION: &str = "app_mention";
const CHANNEL_TYPE_IM: &str = "im";
const CHANNEL_TYPE_MPIM: &str = "mpim";

/// Subtypes that never carry a fresh user message.
const NON_USER_SUBTYPES: [&str; 3] = ["bot_message", "message_changed", "message_deleted"];

#[must_use]
pub fn decide(event: &SlackEvent, bot_user_id: &str) -> DispatchDecision {
    if is_bot_authored(event, bot_user_id) {
        debug!("Ignoring bot-authored or system event");
        return DispatchDecision::Ignore;
    }

    let text = event.text.as_deref().unwrap_or("");
    let event_type = event.event_type.as_deref();
    let channel_type = event.channel_type.as_deref();

    let respond = if event_type == Some(APP_MENTION) {
        true
    } else if channel_type == Some(CHANNEL_TYPE_IM) {
        true
    } else {
        channel_type == Some(CHANNEL_TYPE_MPIM)
            && !bot_user_id.is_empty()
            && text.contains(&mention_token(bot_user_id))
    };

    if !respond {
        return DispatchDecision::Ignore;
    }

    DispatchDecision::Respond(ReplyRequest {
        prompt: extract_prompt(text),
        user_id: event.user.clone().unwrap_or_default(),
        channel_id: event.channel.clone().unwrap_or_default(),
    })
}

fn is_bot_authored(event: &SlackEvent, bot_user_id: &str) -> bool {
    event.bot_id.is_some()
        || event
            .subtype
            .as_deref()
            .is_some_and(|subtype| NON_USER_SUBTYPES.contains(&subtype))
        || (!bot_user_id.is_empty() && event.user.as_deref() == Some(bot_user_id))
}
