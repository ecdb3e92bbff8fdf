use serde::Deserialize;

/// JSON body delivered to the event route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventEnvelope {
    /// Present only on the endpoint verification handshake.
    pub challenge: Option<String>,
    #[serde(rename = "type")]
    pub envelope_type: Option<String>,
    pub event: Option<SlackEvent>,
}

/// The inner `event` object of an event callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackEvent {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub channel_type: Option<String>,
    pub text: Option<String>,
    pub user: Option<String>,
    pub channel: Option<String>,
    pub bot_id: Option<String>,
    pub subtype: Option<String>,
}

/// Everything the event pipeline needs once a reply is owed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub prompt: String,
    pub user_id: String,
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchDecision {
    Ignore,
    Respond(ReplyRequest),
}

impl DispatchDecision {
    #[must_use]
    pub fn should_respond(&self) -> bool {
        matches!(self, DispatchDecision::Respond(_))
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        match self {
            DispatchDecision::Respond(request) => Some(request.prompt.as_str()),
            DispatchDecision::Ignore => None,
        }
    }
}
