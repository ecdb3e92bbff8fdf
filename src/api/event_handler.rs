//! Handler for Slack Events API callbacks.
//!
//! Answers the endpoint verification handshake, and otherwise hands the
//! event to the dispatcher. Replies run on a separate task so Slack gets
//! its acknowledgement right away.

use axum::response::Response;
use tracing::{debug, info};

use super::handler::AppState;
use super::helpers::{ok_challenge, ok_empty};
use super::parsing::Redelivery;
use crate::core::dispatch::decide;
use crate::core::models::{DispatchDecision, EventEnvelope};
use crate::worker::spawn_event_reply;

/// Handle an authenticated event payload.
///
/// `redelivery` comes from Slack's retry headers; redeliveries are
/// acknowledged without dispatch since the first delivery already started
/// a reply.
pub fn handle_event_callback(
    state: &AppState,
    envelope: EventEnvelope,
    redelivery: Option<Redelivery>,
) -> Response {
    if let Some(challenge) = envelope.challenge.as_deref() {
        info!("Answering URL verification challenge");
        return ok_challenge(challenge);
    }

    if let Some(retry) = redelivery {
        info!(
            retry_attempt = retry.attempt,
            retry_reason = retry.reason.as_deref().unwrap_or("unknown"),
            "Skipping redelivered event"
        );
        return ok_empty();
    }

    let Some(event) = envelope.event else {
        debug!("Payload carries no event");
        return ok_empty();
    };

    info!(
        event_type = event.event_type.as_deref().unwrap_or(""),
        channel_type = event.channel_type.as_deref().unwrap_or(""),
        "Processing event callback"
    );

    match decide(&event, &state.bot_user_id) {
        DispatchDecision::Respond(request) => {
            spawn_event_reply(state.services.clone(), request);
        }
        DispatchDecision::Ignore => debug!("No reply owed for event"),
    }

    ok_empty()
}
