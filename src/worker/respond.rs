use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use super::deliver::{generate_or_fallback, resolve_name};
use crate::core::capabilities::Services;
use crate::core::models::ReplyRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Delivered,
    DeliveryFailed,
}

/// Event reply: resolve the sender's name, generate, post to the channel.
///
/// Nothing is surfaced to the caller beyond the outcome; Slack already got
/// its acknowledgement.
pub async fn respond_to_event(services: &Services, request: &ReplyRequest) -> EventOutcome {
    let name = resolve_name(services.users.as_ref(), &request.user_id).await;
    let reply = generate_or_fallback(services.generator.as_ref(), &request.prompt, &name).await;

    match services
        .messenger
        .post_message(&request.channel_id, &reply)
        .await
    {
        Ok(()) => {
            info!(channel_id = %request.channel_id, "Reply posted");
            EventOutcome::Delivered
        }
        Err(e) => {
            error!(channel_id = %request.channel_id, "Failed to post reply: {}", e);
            EventOutcome::DeliveryFailed
        }
    }
}

/// Runs [`respond_to_event`] on its own task, tagged with a correlation id.
pub fn spawn_event_reply(services: Services, request: ReplyRequest) -> JoinHandle<EventOutcome> {
    let span = info_span!(
        "event_reply",
        correlation_id = %Uuid::new_v4(),
        user_id = %request.user_id
    );
    tokio::spawn(async move { respond_to_event(&services, &request).await }.instrument(span))
}
