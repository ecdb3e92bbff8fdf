use axum::http::HeaderMap;

use crate::SlackError;
use crate::core::models::EventEnvelope;
use crate::slack::client::parse_response_url;
use crate::slack_parser::{SlashCommand, parse_form_data};

pub const RETRY_NUM_HEADER: &str = "x-slack-retry-num";
pub const RETRY_REASON_HEADER: &str = "x-slack-retry-reason";

pub fn get_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// A retried delivery, as announced by Slack's retry headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redelivery {
    pub attempt: u32,
    /// e.g. `http_timeout`; absent on older deliveries.
    pub reason: Option<String>,
}

/// Slack's redelivery counter, present only on retried events.
pub fn retry_attempt(headers: &HeaderMap) -> Option<Redelivery> {
    let attempt = get_header_value(headers, RETRY_NUM_HEADER)?.trim().parse().ok()?;
    Some(Redelivery {
        attempt,
        reason: get_header_value(headers, RETRY_REASON_HEADER).map(str::to_string),
    })
}

/// # Errors
///
/// Returns `SlackError::ParseError` if the body is not a JSON object of the
/// expected shape.
pub fn parse_event_body(body: &[u8]) -> Result<EventEnvelope, SlackError> {
    serde_json::from_slice(body)
        .map_err(|e| SlackError::ParseError(format!("Invalid JSON body: {e}")))
}

/// Parses and validates a slash command form body.
///
/// # Errors
///
/// Returns `SlackError::ParseError` for non-UTF-8 bodies, undecodable
/// fields, or a missing or non-http `response_url`.
pub fn parse_command_body(body: &[u8]) -> Result<SlashCommand, SlackError> {
    let form = std::str::from_utf8(body)
        .map_err(|e| SlackError::ParseError(format!("Body is not UTF-8: {e}")))?;
    let command = parse_form_data(form)?;
    parse_response_url(&command.response_url)?;
    Ok(command)
}
