//! Outbound capabilities the reply pipelines depend on.
//!
//! `SlackClient` and `LlmClient` implement these in production; tests swap in
//! in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::SlackError;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the display name for a Slack user id.
    async fn display_name(&self, user_id: &str) -> Result<String, SlackError>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply to `prompt` addressed to `speaker`.
    async fn generate(&self, prompt: &str, speaker: &str) -> Result<String, SlackError>;
}

#[async_trait]
pub trait ChannelPoster: Send + Sync {
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), SlackError>;
}

#[async_trait]
pub trait ResponseUrlPoster: Send + Sync {
    /// POSTs a `{text, response_type}` payload to a slash command's `response_url`.
    async fn post_to_response_url(
        &self,
        response_url: &str,
        payload: &Value,
    ) -> Result<(), SlackError>;
}

/// The set of outbound capabilities shared by every request.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserDirectory>,
    pub generator: Arc<dyn TextGenerator>,
    pub messenger: Arc<dyn ChannelPoster>,
    pub responder: Arc<dyn ResponseUrlPoster>,
}
