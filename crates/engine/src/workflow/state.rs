//! Per-run workflow state.
//!
//! One [`WorkflowState`] is created at the start of each run and owned by that run alone.
//! Steps receive it by exclusive borrow and commit their field only on success, so a field
//! is either fully written or never observed downstream.

use chrono::{DateTime, FixedOffset};
use nudge_types::{ReminderChannel, TerminalReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    /// Identity the run is about.
    pub recipient: String,
    /// Written by the update check.
    pub update_received: Option<bool>,
    /// Written by the time check.
    pub current_time: Option<DateTime<FixedOffset>>,
    /// Written by the reminder dispatch once delivery succeeds.
    pub reminder_channel: ReminderChannel,
    /// Written when the run reaches a successful terminal phase.
    pub terminal_reason: Option<TerminalReason>,
}

impl WorkflowState {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            update_received: None,
            current_time: None,
            reminder_channel: ReminderChannel::None,
            terminal_reason: None,
        }
    }
}
