use percent_encoding::percent_decode_str;
use std::collections::HashMap;

use crate::errors::SlackError;

/// Structure representing a Slack slash command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlashCommand {
    pub command: String,
    pub text: String,
    pub user_id: String,
    pub user_name: String,
    pub response_url: String,
    pub channel_id: String,
    pub team_id: String,
    pub trigger_id: String,
}

/// Decodes an `application/x-www-form-urlencoded` component.
///
/// # Errors
///
/// Returns an error message if the decoded bytes are not valid UTF-8.
///
/// # Examples
///
/// ```
/// use slack_relay::slack_parser::decode_url_component;
///
/// assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// ```
pub fn decode_url_component(input: &str) -> Result<String, String> {
    // '+' means space in form encoding; swap it before percent-decoding so an
    // encoded plus (%2B) survives as a literal '+'.
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Parses the raw form body Slack sends for a slash command.
///
/// Missing optional fields default to empty strings; a missing
/// `response_url` is an error since no reply could be delivered.
///
/// # Errors
///
/// Returns `SlackError::ParseError` if a component fails to decode or
/// `response_url` is absent.
///
/// # Examples
///
/// ```
/// use slack_relay::slack_parser::parse_form_data;
///
/// let form_data = "command=%2Fask&text=hi&user_id=U1&user_name=ada&\
///                  response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1";
///
/// let cmd = parse_form_data(form_data).unwrap();
/// assert_eq!(cmd.command, "/ask");
/// assert_eq!(cmd.response_url, "https://hooks.slack.com/commands/1");
/// ```
pub fn parse_form_data(form_data: &str) -> Result<SlashCommand, SlackError> {
    let mut map: HashMap<String, String> = HashMap::new();

    for pair in form_data.split('&') {
        if let Some(idx) = pair.find('=') {
            let key = decode_url_component(&pair[..idx])
                .map_err(|e| SlackError::ParseError(format!("Failed to decode key: {e}")))?;

            let value = decode_url_component(&pair[idx + 1..])
                .map_err(|e| SlackError::ParseError(format!("Failed to decode value: {e}")))?;

            map.insert(key, value);
        }
    }

    let mut take = |key: &str| map.remove(key).unwrap_or_default();

    let command = SlashCommand {
        command: take("command"),
        text: take("text"),
        user_id: take("user_id"),
        user_name: take("user_name"),
        response_url: take("response_url"),
        channel_id: take("channel_id"),
        team_id: take("team_id"),
        trigger_id: take("trigger_id"),
    };

    if command.response_url.trim().is_empty() {
        return Err(SlackError::ParseError(
            "Missing response_url field".to_string(),
        ));
    }

    Ok(command)
}
