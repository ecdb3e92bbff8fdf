use once_cell::sync::Lazy;
use regex::Regex;

/// Name used in place of the sender's display name when the lookup fails.
pub const PLACEHOLDER_NAME: &str = "there";

/// Reply delivered when text generation fails or returns nothing.
pub const GENERATION_FALLBACK: &str =
    "Sorry, I couldn't come up with a reply right now. Please try again in a moment.";

/// Message posted to a slash command's `response_url` when handling it fails.
pub const COMMAND_FALLBACK: &str =
    "Sorry, something went wrong while handling your command. Please try again later.";

/// Max length of a prompt forwarded to the model, in characters.
pub const MAX_PROMPT_LEN: usize = 4_000;

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@[A-Za-z0-9]+>").expect("static regex compile"));

/// The literal token Slack uses when a message mentions `user_id`.
#[must_use]
pub fn mention_token(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Removes the first `<@ID>` mention token and trims the result.
///
/// Only one token is stripped: `"<@B> ping <@B>"` becomes `"ping <@B>"`.
#[must_use]
pub fn extract_prompt(text: &str) -> String {
    MENTION_RE.replacen(text, 1, "").trim().to_string()
}

/// Prompt sent to the model for a slash command invocation.
#[must_use]
pub fn command_prompt(user_name: &str, text: &str) -> String {
    format!("{user_name} asks: {text}")
}

/// Strips control characters (keeping newlines and tabs) and truncates to
/// [`MAX_PROMPT_LEN`] characters.
#[must_use]
pub fn sanitize_prompt(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .take(MAX_PROMPT_LEN)
        .collect()
}
