//! HTTP bindings for the reminder workflow's collaborators.
//!
//! - [`SlackClient`] posts chat reminders via `chat.postMessage`
//! - [`GmailClient`] searches the mailbox for today's update and sends e-mail reminders
//! - [`ChannelRouter`] implements [`nudge_engine::ReminderDispatcher`] on top of both
//!
//! Each client is a thin wrapper around a configured `reqwest::Client`. Base URLs are
//! validated on construction: non-local hosts must use HTTPS.
//!
//! # Example
//!
//! ```ignore
//! use nudge_api::{ChannelRouter, GmailClient, SlackClient};
//!
//! let slack = SlackClient::new(SLACK_API_BASE, token, "C0123")?;
//! let gmail = GmailClient::new(GMAIL_API_BASE, access_token, clock)?;
//! let router = ChannelRouter::new(slack, gmail.clone());
//! ```

mod gmail;
mod http;
mod router;
mod slack;

pub use gmail::{DEFAULT_REMINDER_SUBJECT, DEFAULT_UPDATE_SUBJECT, GMAIL_API_BASE, GmailClient};
pub use http::validate_base_url;
pub use router::ChannelRouter;
pub use slack::{SLACK_API_BASE, SlackClient};
