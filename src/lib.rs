//! slack-relay - a Slack bot that answers mentions, DMs and slash commands
//! with text from an LLM.
//!
//! Inbound webhooks are authenticated with Slack's request signature, the
//! dispatcher decides whether a reply is owed, and a per-request task looks
//! up the sender, generates a reply and posts it back.
//!
//! # Architecture
//!
//! - `api`: axum routes, request signing, payload parsing
//! - `core`: configuration, event dispatch, capability traits
//! - `worker`: reply pipelines for events and slash commands
//! - `slack` / `ai`: the Slack Web API and `OpenAI` clients
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use slack_relay::ai::LlmClient;
//! use slack_relay::api::{AppState, router};
//! use slack_relay::core::capabilities::Services;
//! use slack_relay::core::config::AppConfig;
//! use slack_relay::slack::SlackClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     slack_relay::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let slack = Arc::new(SlackClient::new(config.slack_bot_token.clone()));
//!     let llm = Arc::new(LlmClient::new(
//!         config.openai_api_key.clone(),
//!         config.openai_org_id.clone(),
//!         config.openai_model.clone(),
//!         config.openai_api_base.clone(),
//!     ));
//!     let services = Services {
//!         users: slack.clone(),
//!         generator: llm,
//!         messenger: slack.clone(),
//!         responder: slack,
//!     };
//!
//!     let listener = tokio::net::TcpListener::bind(config.listen_address()).await?;
//!     let app = router(AppState::new(config, "U0BOT", services));
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod prompt;
pub mod slack;
pub mod slack_parser;
pub mod worker;

pub use errors::SlackError;

/// Configure structured JSON logging.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; only the first call installs a subscriber.
///
/// # Example
///
/// ```
/// slack_relay::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
