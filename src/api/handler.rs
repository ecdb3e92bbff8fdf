//! HTTP entrypoint - thin router that delegates to specialized handlers.
//!
//! Every Slack route is authenticated against the raw request bytes before
//! anything is parsed; a failed check answers 401 and has no side effects.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use tracing::error;

use super::helpers::{HEALTH_BODY, err_response, unauthorized};
use super::{event_handler, parsing, signature, slash_handler};
use crate::core::capabilities::Services;
use crate::core::config::AppConfig;

pub const EVENTS_PATH: &str = "/slack/events";
pub const COMMANDS_PATH: &str = "/slack/commands";
pub const HEALTH_PATH: &str = "/health";

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub bot_user_id: Arc<str>,
    pub services: Services,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, bot_user_id: &str, services: Services) -> Self {
        Self {
            config: Arc::new(config),
            bot_user_id: Arc::from(bot_user_id),
            services,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(EVENTS_PATH, post(slack_events))
        .route(COMMANDS_PATH, post(slack_commands))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

pub async fn health() -> &'static str {
    HEALTH_BODY
}

#[tracing::instrument(level = "info", skip_all)]
pub async fn slack_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authenticate(&state, &headers, &body) {
        return unauthorized();
    }

    let envelope = match parsing::parse_event_body(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Failed to parse Slack event: {}", e);
            return err_response(StatusCode::BAD_REQUEST, &format!("Parse Error: {e}"));
        }
    };

    event_handler::handle_event_callback(&state, envelope, parsing::retry_attempt(&headers))
}

#[tracing::instrument(level = "info", skip_all)]
pub async fn slack_commands(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authenticate(&state, &headers, &body) {
        return unauthorized();
    }

    match parsing::parse_command_body(&body) {
        Ok(command) => slash_handler::handle_slash_command(&state, command),
        Err(e) => {
            error!("Failed to parse slash command: {}", e);
            err_response(StatusCode::BAD_REQUEST, &format!("Parse Error: {e}"))
        }
    }
}

fn authenticate(state: &AppState, headers: &HeaderMap, body: &Bytes) -> bool {
    signature::verify_slack_request(
        headers,
        Some(body.as_ref()),
        None,
        &state.config.slack_signing_secret,
    )
}
