#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use slack_relay::SlackError;
use slack_relay::core::capabilities::{
    ChannelPoster, ResponseUrlPoster, Services, TextGenerator, UserDirectory,
};
use slack_relay::core::config::AppConfig;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BOT_USER_ID: &str = "UBOT";
pub const RESPONSE_URL: &str = "https://hooks.slack.com/commands/T1/123/abc";

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Post { channel: String, text: String },
    Response { url: String, payload: Value },
}

pub struct FakeSlack {
    display_name: Option<String>,
    fail_posts: bool,
    failing_response_calls: Vec<usize>,
    response_calls: AtomicUsize,
    pub lookups: Mutex<Vec<String>>,
    deliveries: UnboundedSender<Delivery>,
}

#[async_trait]
impl UserDirectory for FakeSlack {
    async fn display_name(&self, user_id: &str) -> Result<String, SlackError> {
        self.lookups.lock().unwrap().push(user_id.to_string());
        self.display_name
            .clone()
            .ok_or_else(|| SlackError::ApiError("user_not_found".to_string()))
    }
}

#[async_trait]
impl ChannelPoster for FakeSlack {
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), SlackError> {
        if self.fail_posts {
            return Err(SlackError::ApiError("channel_not_found".to_string()));
        }
        let _ = self.deliveries.send(Delivery::Post {
            channel: channel_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl ResponseUrlPoster for FakeSlack {
    async fn post_to_response_url(
        &self,
        response_url: &str,
        payload: &Value,
    ) -> Result<(), SlackError> {
        let call = self.response_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_response_calls.contains(&call) {
            return Err(SlackError::HttpError("response_url unreachable".to_string()));
        }
        let _ = self.deliveries.send(Delivery::Response {
            url: response_url.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

pub struct FakeLlm {
    reply: Result<String, String>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl TextGenerator for FakeLlm {
    async fn generate(&self, prompt: &str, speaker: &str) -> Result<String, SlackError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), speaker.to_string()));
        self.reply.clone().map_err(SlackError::OpenAIError)
    }
}

pub struct HarnessBuilder {
    display_name: Option<String>,
    reply: Result<String, String>,
    fail_posts: bool,
    failing_response_calls: Vec<usize>,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            display_name: Some("Ada".to_string()),
            reply: Ok("Hello from the model".to_string()),
            fail_posts: false,
            failing_response_calls: Vec::new(),
        }
    }
}

impl HarnessBuilder {
    pub fn failing_lookup(mut self) -> Self {
        self.display_name = None;
        self
    }

    pub fn reply(mut self, reply: &str) -> Self {
        self.reply = Ok(reply.to_string());
        self
    }

    pub fn failing_generation(mut self) -> Self {
        self.reply = Err("model overloaded".to_string());
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    /// Zero-based indexes of `response_url` calls that should fail.
    pub fn failing_response_calls(mut self, calls: &[usize]) -> Self {
        self.failing_response_calls = calls.to_vec();
        self
    }

    pub fn build(self) -> Harness {
        let (tx, rx) = unbounded_channel();
        let slack = Arc::new(FakeSlack {
            display_name: self.display_name,
            fail_posts: self.fail_posts,
            failing_response_calls: self.failing_response_calls,
            response_calls: AtomicUsize::new(0),
            lookups: Mutex::new(Vec::new()),
            deliveries: tx,
        });
        let llm = Arc::new(FakeLlm {
            reply: self.reply,
            prompts: Mutex::new(Vec::new()),
        });
        let services = Services {
            users: slack.clone(),
            generator: llm.clone(),
            messenger: slack.clone(),
            responder: slack.clone(),
        };
        Harness {
            services,
            slack,
            llm,
            deliveries: rx,
        }
    }
}

pub struct Harness {
    pub services: Services,
    pub slack: Arc<FakeSlack>,
    pub llm: Arc<FakeLlm>,
    deliveries: UnboundedReceiver<Delivery>,
}

impl Harness {
    /// Waits briefly for the next delivery made by a spawned pipeline.
    pub async fn next_delivery(&mut self) -> Option<Delivery> {
        tokio::time::timeout(Duration::from_secs(2), self.deliveries.recv())
            .await
            .ok()
            .flatten()
    }

    pub async fn assert_no_delivery(&mut self) {
        let got = tokio::time::timeout(Duration::from_millis(200), self.deliveries.recv()).await;
        assert!(got.is_err(), "unexpected delivery: {got:?}");
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.llm.prompts.lock().unwrap().clone()
    }
}

pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("SLACK_SIGNING_SECRET", SIGNING_SECRET),
        ("SLACK_BOT_TOKEN", "xoxb-test"),
        ("SLACK_BOT_USER_ID", BOT_USER_ID),
        ("OPENAI_API_KEY", "sk-test"),
    ]);
    AppConfig::from_lookup(|key: &str| vars.get(key).map(|v| (*v).to_string()))
        .expect("test config is complete")
}
