//! Handler for Slack slash commands.
//!
//! Slack expects an answer within three seconds, so the route acknowledges
//! with an empty 200 and all further communication goes through the
//! command's `response_url`.

use axum::response::Response;
use tracing::info;

use super::handler::AppState;
use super::helpers::ok_empty;
use crate::slack_parser::SlashCommand;
use crate::worker::spawn_command_reply;

pub fn handle_slash_command(state: &AppState, command: SlashCommand) -> Response {
    info!(
        command = %command.command,
        user_id = %command.user_id,
        "Slash command received"
    );

    spawn_command_reply(state.services.clone(), command);

    ok_empty()
}
