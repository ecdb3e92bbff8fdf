use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::core::capabilities::Services;
use crate::errors::SlackError;
use crate::prompt::{COMMAND_FALLBACK, command_prompt};
use crate::slack::response_builder::{create_ephemeral_payload, create_in_channel_payload};
use crate::slack_parser::SlashCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Replied,
    /// A step failed and the fallback message was delivered instead.
    FellBack,
    /// A step failed and the fallback message could not be delivered either.
    FallbackFailed,
}

/// Slash command reply, run after the empty acknowledgement:
/// 1. echo the invocation to the `response_url`
/// 2. generate a reply to `"<user_name> asks: <text>"`
/// 3. deliver the reply to the `response_url`
///
/// Any failure replaces the remaining steps with [`COMMAND_FALLBACK`].
pub async fn respond_to_command(services: &Services, command: &SlashCommand) -> CommandOutcome {
    let Err(e) = run_steps(services, command).await else {
        info!("Slash command reply delivered");
        return CommandOutcome::Replied;
    };

    error!("Slash command handling failed: {}", e);

    let fallback = create_ephemeral_payload(COMMAND_FALLBACK);
    match services
        .responder
        .post_to_response_url(&command.response_url, &fallback)
        .await
    {
        Ok(()) => CommandOutcome::FellBack,
        Err(e) => {
            error!("Failed to deliver fallback message: {}", e);
            CommandOutcome::FallbackFailed
        }
    }
}

async fn run_steps(services: &Services, command: &SlashCommand) -> Result<(), SlackError> {
    let echo = create_in_channel_payload(&echo_text(command));
    services
        .responder
        .post_to_response_url(&command.response_url, &echo)
        .await?;

    let prompt = command_prompt(&command.user_name, &command.text);
    let reply = services
        .generator
        .generate(&prompt, &command.user_name)
        .await?;
    if reply.trim().is_empty() {
        return Err(SlackError::OpenAIError("empty reply".to_string()));
    }

    services
        .responder
        .post_to_response_url(&command.response_url, &create_in_channel_payload(&reply))
        .await
}

/// `"/ask what's up"`, or just the command when no text was given.
#[must_use]
pub fn echo_text(command: &SlashCommand) -> String {
    let text = command.text.trim();
    if text.is_empty() {
        command.command.clone()
    } else {
        format!("{} {}", command.command, text)
    }
}

/// Runs [`respond_to_command`] on its own task, tagged with a correlation id.
pub fn spawn_command_reply(services: Services, command: SlashCommand) -> JoinHandle<CommandOutcome> {
    let span = info_span!(
        "command_reply",
        correlation_id = %Uuid::new_v4(),
        command = %command.command,
        user_id = %command.user_id
    );
    tokio::spawn(async move { respond_to_command(&services, &command).await }.instrument(span))
}
