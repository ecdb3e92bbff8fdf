//! Payloads POSTed to a slash command's `response_url`.

use serde_json::{Value, json};

/// Payload for a reply visible to everyone in the channel.
///
/// # Examples
///
/// ```
/// use slack_relay::slack::response_builder::create_in_channel_payload;
///
/// let payload = create_in_channel_payload("Hello!");
/// assert_eq!(payload["response_type"], "in_channel");
/// ```
#[must_use]
pub fn create_in_channel_payload(text: &str) -> Value {
    json!({
        "text": text,
        "response_type": "in_channel"
    })
}

/// Payload for a reply only the invoking user can see.
#[must_use]
pub fn create_ephemeral_payload(text: &str) -> Value {
    json!({
        "text": text,
        "response_type": "ephemeral"
    })
}
