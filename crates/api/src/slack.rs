//! Slack Web API client for chat reminders.

use anyhow::Result;
use nudge_engine::DispatchError;
use nudge_types::ReminderChannel;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::http::{bearer_client, excerpt, validate_base_url};

/// Public Slack Web API base.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Posts messages into a single configured Slack conversation.
#[derive(Debug, Clone)]
pub struct SlackClient {
    base_url: String,
    channel_id: String,
    http: Client,
}

/// The subset of a Slack Web API envelope the client inspects.
#[derive(Debug, Deserialize)]
struct SlackEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackClient {
    /// Builds a client that posts into `channel_id` using a bot token.
    pub fn new(base_url: &str, token: &str, channel_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            channel_id: channel_id.into(),
            http: bearer_client(token)?,
        })
    }

    /// Calls `chat.postMessage`.
    ///
    /// Slack answers `200 OK` even for rejected calls; the `ok` flag in the body decides.
    pub async fn post_message(&self, text: &str) -> Result<(), DispatchError> {
        let url = format!("{}/chat.postMessage", self.base_url);
        debug!(%url, channel = %self.channel_id, "posting slack message");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "channel": self.channel_id, "text": text }))
            .send()
            .await
            .map_err(|error| DispatchError::unreachable(ReminderChannel::Slack, error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| DispatchError::unreachable(ReminderChannel::Slack, error.to_string()))?;
        if !status.is_success() {
            return Err(DispatchError::unreachable(
                ReminderChannel::Slack,
                format!("HTTP {}: {}", status, excerpt(&body)),
            ));
        }

        let envelope: SlackEnvelope = serde_json::from_str(&body).map_err(|error| {
            DispatchError::unreachable(ReminderChannel::Slack, format!("unreadable response: {error}"))
        })?;
        if envelope.ok {
            Ok(())
        } else {
            Err(DispatchError::rejected(
                ReminderChannel::Slack,
                envelope.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}
