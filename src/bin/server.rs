use std::sync::Arc;

use anyhow::{Context, Result};
use slack_relay::ai::LlmClient;
use slack_relay::api::{AppState, router};
use slack_relay::core::capabilities::Services;
use slack_relay::core::config::AppConfig;
use slack_relay::slack::SlackClient;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    slack_relay::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        e
    })?;
    info!(?config, "Configuration loaded");

    let slack = Arc::new(SlackClient::new(config.slack_bot_token.clone()));
    let llm = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_org_id.clone(),
        config.openai_model.clone(),
        config.openai_api_base.clone(),
    ));

    let bot_user_id = match config.slack_bot_user_id.clone() {
        Some(id) => id,
        None => {
            let id = slack
                .get_bot_user_id()
                .await
                .context("SLACK_BOT_USER_ID not set and auth.test failed")?;
            info!(bot_user_id = %id, "Resolved bot user id via auth.test");
            id
        }
    };

    let services = Services {
        users: slack.clone(),
        generator: llm,
        messenger: slack.clone(),
        responder: slack,
    };

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(bind_address = %address, "Slack relay listening");

    let app = router(AppState::new(config, &bot_user_id, services));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("Slack relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
