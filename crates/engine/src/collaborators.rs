//! Capabilities the workflow consumes from external services.
//!
//! Transport, authentication, and retries belong to the implementations; the workflow only
//! sees these narrow contracts.

use async_trait::async_trait;
use nudge_types::ReminderChannel;

use crate::error::{DispatchError, UpstreamQueryError};

/// Answers whether a user has already sent today's work update.
#[async_trait]
pub trait UpdateStatusSource: Send + Sync {
    /// Returns `Ok(true)` when an update for today exists. An answer that cannot be
    /// classified must surface as [`UpstreamQueryError::Ambiguous`], never as `Ok(false)`.
    async fn has_update_today(&self, user: &str) -> Result<bool, UpstreamQueryError>;
}

/// Delivers a reminder message on a specific channel.
#[async_trait]
pub trait ReminderDispatcher: Send + Sync {
    /// Sends `message` to `recipient` on `channel`. Implementations must not fall back to a
    /// different channel on failure.
    async fn send(&self, channel: ReminderChannel, recipient: &str, message: &str) -> Result<(), DispatchError>;
}
