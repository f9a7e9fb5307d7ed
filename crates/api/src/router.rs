use async_trait::async_trait;
use nudge_engine::{DispatchError, ReminderDispatcher};
use nudge_types::ReminderChannel;
use tracing::info;

use crate::{GmailClient, SlackClient};

/// Dispatches reminders to Slack or Gmail depending on the requested channel.
///
/// A failed send is reported as-is; the router never retries on the other channel.
#[derive(Clone)]
pub struct ChannelRouter {
    slack: SlackClient,
    gmail: GmailClient,
}

impl ChannelRouter {
    pub fn new(slack: SlackClient, gmail: GmailClient) -> Self {
        Self { slack, gmail }
    }
}

#[async_trait]
impl ReminderDispatcher for ChannelRouter {
    async fn send(&self, channel: ReminderChannel, recipient: &str, message: &str) -> Result<(), DispatchError> {
        match channel {
            ReminderChannel::Slack => self.slack.post_message(message).await?,
            ReminderChannel::Email => self.gmail.send_email(recipient, message).await?,
            ReminderChannel::None => return Err(DispatchError::rejected(channel, "no reminder channel selected")),
        }
        info!(%channel, %recipient, "reminder delivered");
        Ok(())
    }
}
