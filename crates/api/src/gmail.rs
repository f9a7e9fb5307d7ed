//! Gmail API client: update-status lookups and e-mail reminders.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use chrono::{DateTime, FixedOffset, NaiveTime};
use nudge_engine::{Clock, DispatchError, UpdateStatusSource, UpstreamQueryError};
use nudge_types::ReminderChannel;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::http::{bearer_client, excerpt, validate_base_url};

/// Public Gmail API base.
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
/// Subject fragment that identifies a work update.
pub const DEFAULT_UPDATE_SUBJECT: &str = "work update";
/// Subject used for e-mail reminders.
pub const DEFAULT_REMINDER_SUBJECT: &str = "Reminder: work update";

/// Gmail client acting on the authenticated mailbox (`users/me`).
///
/// The access token is used as-is; obtaining and refreshing it happens outside this crate.
#[derive(Clone)]
pub struct GmailClient {
    base_url: String,
    http: Client,
    clock: Arc<dyn Clock>,
    update_subject: String,
    reminder_subject: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    #[serde(default)]
    messages: Option<Vec<Value>>,
    #[serde(default)]
    result_size_estimate: Option<u64>,
}

impl GmailClient {
    /// `clock` decides what "today" means for update lookups; pass the same clock the
    /// workflow reads so both agree on the time zone.
    pub fn new(base_url: &str, access_token: &str, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            http: bearer_client(access_token)?,
            clock,
            update_subject: DEFAULT_UPDATE_SUBJECT.to_string(),
            reminder_subject: DEFAULT_REMINDER_SUBJECT.to_string(),
        })
    }

    pub fn with_update_subject(mut self, subject: impl Into<String>) -> Self {
        self.update_subject = subject.into();
        self
    }

    pub fn with_reminder_subject(mut self, subject: impl Into<String>) -> Self {
        self.reminder_subject = subject.into();
        self
    }

    /// Gmail search expression matching an update from `sender` since local midnight.
    fn update_query(&self, sender: &str, now: DateTime<FixedOffset>) -> String {
        let start_of_day = now - (now.time() - NaiveTime::MIN);
        format!(
            "from:{} subject:\"{}\" after:{}",
            sender,
            self.update_subject,
            start_of_day.timestamp()
        )
    }

    /// Sends a plain-text e-mail from the authenticated mailbox.
    pub async fn send_email(&self, to: &str, body: &str) -> Result<(), DispatchError> {
        let url = format!("{}/gmail/v1/users/me/messages/send", self.base_url);
        let raw = URL_SAFE.encode(render_message(to, &self.reminder_subject, body));
        debug!(%url, "sending reminder e-mail");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "raw": raw }))
            .send()
            .await
            .map_err(|error| DispatchError::unreachable(ReminderChannel::Email, error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        let detail = format!("HTTP {}: {}", status, excerpt(&body));
        if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
            Err(DispatchError::rejected(ReminderChannel::Email, detail))
        } else {
            Err(DispatchError::unreachable(ReminderChannel::Email, detail))
        }
    }
}

#[async_trait]
impl UpdateStatusSource for GmailClient {
    async fn has_update_today(&self, user: &str) -> Result<bool, UpstreamQueryError> {
        let url = format!("{}/gmail/v1/users/me/messages", self.base_url);
        let query = self.update_query(user, self.clock.now());
        debug!(%url, %query, "searching mailbox for today's update");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query.as_str()), ("maxResults", "1")])
            .send()
            .await
            .map_err(|error| UpstreamQueryError::unreachable(error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| UpstreamQueryError::unreachable(error.to_string()))?;
        if !status.is_success() {
            return Err(UpstreamQueryError::unreachable(format!("HTTP {}: {}", status, excerpt(&body))));
        }

        let listing: MessageListResponse = serde_json::from_str(&body)
            .map_err(|error| UpstreamQueryError::ambiguous(format!("unreadable search response: {error}")))?;
        classify_listing(&listing)
    }
}

fn classify_listing(listing: &MessageListResponse) -> Result<bool, UpstreamQueryError> {
    let message_count = listing.messages.as_ref().map_or(0, Vec::len);
    match (message_count, listing.result_size_estimate) {
        (count, _) if count > 0 => Ok(true),
        (0, Some(0)) => Ok(false),
        (_, Some(estimate)) => Err(UpstreamQueryError::ambiguous(format!(
            "search estimated {estimate} matches but returned none"
        ))),
        (_, None) => Err(UpstreamQueryError::ambiguous("search response carried no result count")),
    }
}

fn render_message(to: &str, subject: &str, body: &str) -> String {
    format!("To: {to}\r\nSubject: {subject}\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\nMIME-Version: 1.0\r\n\r\n{body}\r\n")
}
