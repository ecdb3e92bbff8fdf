//! Slack API client module
//!
//! Wraps the Slack Web API calls the relay needs (`users.info`,
//! `chat.postMessage`, `auth.test`) and the plain HTTP POST to a slash
//! command's `response_url`. Each call is a single attempt.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{SlackApiChatPostMessageRequest, SlackApiUsersInfoRequest};
use slack_morphism::{
    SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent, SlackUserId,
};
use std::time::Duration;
use tracing::{error, warn};
use url::Url;

use crate::core::capabilities::{ChannelPoster, ResponseUrlPoster, UserDirectory};
use crate::errors::SlackError;

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a SlackError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Slack API client
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    fn connector() -> Result<&'static SlackHyperClient, SlackError> {
        SLACK_CLIENT.as_ref().ok_or_else(|| {
            SlackError::GeneralError("Slack HTTP connector not initialized".to_string())
        })
    }

    /// Resolves the bot's own member id through `auth.test`.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API call fails.
    pub async fn get_bot_user_id(&self) -> Result<String, SlackError> {
        let session = Self::connector()?.open_session(&self.token);
        let test_resp = session.auth_test().await?;
        Ok(test_resp.user_id.0)
    }

    /// Display name for a user, falling back to the real name.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API call fails or the profile carries
    /// no usable name.
    pub async fn get_user_display_name(&self, user_id: &str) -> Result<String, SlackError> {
        if user_id.is_empty() {
            return Err(SlackError::ApiError("no user id to look up".to_string()));
        }

        let session = Self::connector()?.open_session(&self.token);
        let user_info_req = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));
        let info = session.users_info(&user_info_req).await?;

        let profile = info.user.profile.as_ref();
        profile
            .and_then(|p| p.display_name.clone())
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                profile
                    .and_then(|p| p.real_name.clone())
                    .filter(|name| !name.trim().is_empty())
            })
            .ok_or_else(|| SlackError::ApiError(format!("user {user_id} has no display name")))
    }

    /// # Errors
    ///
    /// Returns an error if the channel id is empty or the Slack API call fails.
    pub async fn post_message(&self, channel_id: &str, message: &str) -> Result<(), SlackError> {
        if channel_id.is_empty() {
            return Err(SlackError::ApiError("no channel to post to".to_string()));
        }

        let session = Self::connector()?.open_session(&self.token);
        let post_req = SlackApiChatPostMessageRequest::new(
            SlackChannelId(channel_id.to_string()),
            SlackMessageContent::new().with_text(message.to_string()),
        );

        session.chat_post_message(&post_req).await?;

        Ok(())
    }

    /// POSTs a JSON payload to a slash command `response_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an http(s) URL, the request fails,
    /// or Slack answers with a non-success status.
    pub async fn send_response_url(
        &self,
        response_url: &str,
        payload: &Value,
    ) -> Result<(), SlackError> {
        let url = parse_response_url(response_url)?;

        let resp = HTTP_CLIENT.post(url).json(payload).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "response_url POST failed: status={} body={}",
                status, body_text
            );
            return Err(SlackError::HttpError(format!(
                "response_url returned status {status}"
            )));
        }

        Ok(())
    }
}

/// Accepts only absolute http(s) URLs.
///
/// # Errors
///
/// Returns `SlackError::ParseError` for anything else.
pub fn parse_response_url(raw: &str) -> Result<Url, SlackError> {
    let url = Url::parse(raw)
        .map_err(|e| SlackError::ParseError(format!("invalid response_url: {e}")))?;
    match url.scheme() {
        "https" | "http" => Ok(url),
        other => Err(SlackError::ParseError(format!(
            "unsupported response_url scheme: {other}"
        ))),
    }
}

#[async_trait]
impl UserDirectory for SlackClient {
    async fn display_name(&self, user_id: &str) -> Result<String, SlackError> {
        self.get_user_display_name(user_id).await
    }
}

#[async_trait]
impl ChannelPoster for SlackClient {
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), SlackError> {
        SlackClient::post_message(self, channel_id, text).await
    }
}

#[async_trait]
impl ResponseUrlPoster for SlackClient {
    async fn post_to_response_url(
        &self,
        response_url: &str,
        payload: &Value,
    ) -> Result<(), SlackError> {
        self.send_response_url(response_url, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::response_builder::create_in_channel_payload;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn response_url_must_be_http() {
        assert!(parse_response_url("https://hooks.slack.com/commands/T1/2/3").is_ok());
        assert!(parse_response_url("ftp://hooks.slack.com/").is_err());
        assert!(parse_response_url("not a url").is_err());
        assert!(parse_response_url("").is_err());
    }

    #[tokio::test]
    async fn posts_payload_to_response_url() {
        let server = MockServer::start().await;
        let payload = create_in_channel_payload("hello there");

        Mock::given(method("POST"))
            .and(path("/commands/T1/2/3"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlackClient::new("xoxb-test".to_string());
        let url = format!("{}/commands/T1/2/3", server.uri());
        client.send_response_url(&url, &payload).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("expired_url"))
            .mount(&server)
            .await;

        let client = SlackClient::new("xoxb-test".to_string());
        let err = client
            .send_response_url(&server.uri(), &create_in_channel_payload("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, SlackError::HttpError(_)));
    }

    #[tokio::test]
    async fn empty_ids_fail_without_calling_slack() {
        let client = SlackClient::new("xoxb-test".to_string());
        assert!(client.get_user_display_name("").await.is_err());
        assert!(client.post_message("", "hi").await.is_err());
    }
}
