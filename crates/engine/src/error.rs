//! Error taxonomy for workflow runs.
//!
//! Each collaborator has its own error type. A caller-supplied deadline that expires is
//! reported as the `Timeout` variant of the error belonging to the step that was waiting.

use nudge_types::{ReminderChannel, WorkflowStep};
use thiserror::Error;

/// The update-status service could not give a trustworthy answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamQueryError {
    #[error("update-status service unreachable: {message}")]
    Unreachable { message: String },

    #[error("update-status answer was ambiguous: {detail}")]
    Ambiguous { detail: String },

    #[error("update-status query timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl UpstreamQueryError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable { message: message.into() }
    }

    pub fn ambiguous(detail: impl Into<String>) -> Self {
        Self::Ambiguous { detail: detail.into() }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }
}

/// A reminder could not be delivered on the chosen channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("{channel} reminder channel unreachable: {message}")]
    Unreachable { channel: ReminderChannel, message: String },

    #[error("{channel} reminder rejected: {reason}")]
    Rejected { channel: ReminderChannel, reason: String },

    #[error("{channel} reminder dispatch timed out after {timeout_ms}ms")]
    Timeout { channel: ReminderChannel, timeout_ms: u64 },

    #[error("reminder dispatch attempted before {missing} was known")]
    NotReady { missing: &'static str },
}

impl DispatchError {
    pub fn unreachable(channel: ReminderChannel, message: impl Into<String>) -> Self {
        Self::Unreachable {
            channel,
            message: message.into(),
        }
    }

    pub fn rejected(channel: ReminderChannel, reason: impl Into<String>) -> Self {
        Self::Rejected {
            channel,
            reason: reason.into(),
        }
    }

    pub fn timeout(channel: ReminderChannel, timeout_ms: u64) -> Self {
        Self::Timeout { channel, timeout_ms }
    }

    /// Channel the failed attempt targeted, if one had been chosen.
    pub fn channel(&self) -> ReminderChannel {
        match self {
            Self::Unreachable { channel, .. } | Self::Rejected { channel, .. } | Self::Timeout { channel, .. } => *channel,
            Self::NotReady { .. } => ReminderChannel::None,
        }
    }
}

/// Reason a run ended in `ABORTED`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("update check failed: {0}")]
    UpdateCheck(#[from] UpstreamQueryError),

    #[error("reminder dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl RunError {
    /// The step whose failure aborted the run.
    pub fn step(&self) -> WorkflowStep {
        match self {
            Self::UpdateCheck(_) => WorkflowStep::UpdateCheck,
            Self::Dispatch(_) => WorkflowStep::ReminderDispatch,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::UpdateCheck(UpstreamQueryError::Timeout { .. }) | Self::Dispatch(DispatchError::Timeout { .. })
        )
    }
}
