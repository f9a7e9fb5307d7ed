//! Strongly typed run vocabulary shared by the engine, the HTTP collaborators, and the CLI.
//!
//! The serialized forms use `SCREAMING_SNAKE_CASE` so that reports read the same in
//! JSON output, log lines, and alerting rules.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Delivery channel for a reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderChannel {
    /// No channel has been chosen yet.
    #[default]
    None,
    /// Chat message.
    Slack,
    /// E-mail message.
    Email,
}

impl ReminderChannel {
    /// Stable lowercase identifier used in log fields and error messages.
    pub fn id(self) -> &'static str {
        match self {
            ReminderChannel::None => "none",
            ReminderChannel::Slack => "slack",
            ReminderChannel::Email => "email",
        }
    }
}

impl fmt::Display for ReminderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Why a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalReason {
    /// The user already reported today; nothing was sent.
    UpdateAlreadyReceived,
    /// A reminder was delivered on the chosen channel.
    ReminderSent,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalReason::UpdateAlreadyReceived => f.write_str("UPDATE_ALREADY_RECEIVED"),
            TerminalReason::ReminderSent => f.write_str("REMINDER_SENT"),
        }
    }
}

/// The steps a run can execute, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    UpdateCheck,
    TimeCheck,
    ReminderDispatch,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStep::UpdateCheck => f.write_str("update_check"),
            WorkflowStep::TimeCheck => f.write_str("time_check"),
            WorkflowStep::ReminderDispatch => f.write_str("reminder_dispatch"),
        }
    }
}

/// Phases of the reminder state machine.
///
/// ```text
/// START -> CHECKING_UPDATE -> DONE_UPDATE_RECEIVED
///                          -> CHECKING_TIME -> DISPATCHING -> DONE_REMINDER_SENT
///                          -> ABORTED                      -> ABORTED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunPhase {
    Start,
    CheckingUpdate,
    CheckingTime,
    Dispatching,
    DoneUpdateReceived,
    DoneReminderSent,
    Aborted,
}

impl RunPhase {
    /// Phases reachable from `self` in a single transition.
    pub fn allowed_next(self) -> &'static [RunPhase] {
        match self {
            RunPhase::Start => &[RunPhase::CheckingUpdate],
            RunPhase::CheckingUpdate => &[RunPhase::DoneUpdateReceived, RunPhase::CheckingTime, RunPhase::Aborted],
            RunPhase::CheckingTime => &[RunPhase::Dispatching],
            RunPhase::Dispatching => &[RunPhase::DoneReminderSent, RunPhase::Aborted],
            RunPhase::DoneUpdateReceived | RunPhase::DoneReminderSent | RunPhase::Aborted => &[],
        }
    }

    pub fn can_transition_to(self, next: RunPhase) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Terminal reason for the two successful terminal phases.
    pub fn terminal_reason(self) -> Option<TerminalReason> {
        match self {
            RunPhase::DoneUpdateReceived => Some(TerminalReason::UpdateAlreadyReceived),
            RunPhase::DoneReminderSent => Some(TerminalReason::ReminderSent),
            _ => None,
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunPhase::Start => "START",
            RunPhase::CheckingUpdate => "CHECKING_UPDATE",
            RunPhase::CheckingTime => "CHECKING_TIME",
            RunPhase::Dispatching => "DISPATCHING",
            RunPhase::DoneUpdateReceived => "DONE_UPDATE_RECEIVED",
            RunPhase::DoneReminderSent => "DONE_REMINDER_SENT",
            RunPhase::Aborted => "ABORTED",
        };
        f.write_str(label)
    }
}

/// A single recorded move through the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub from: RunPhase,
    pub to: RunPhase,
    pub at: DateTime<Utc>,
}

/// Describes why an aborted run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    /// Step whose collaborator call failed.
    pub step: WorkflowStep,
    /// Human-readable error chain.
    pub message: String,
    /// True when the failure was a caller-supplied deadline expiring.
    pub timed_out: bool,
}

/// Serializable summary of one run, suitable for stdout and log shipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub final_phase: RunPhase,
    pub terminal_reason: Option<TerminalReason>,
    pub reminder_channel: ReminderChannel,
    pub update_received: Option<bool>,
    pub current_time: Option<DateTime<FixedOffset>>,
    pub failure: Option<RunFailure>,
    pub transitions: Vec<PhaseTransition>,
}

impl RunReport {
    pub fn is_aborted(&self) -> bool {
        self.final_phase == RunPhase::Aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [RunPhase; 7] = [
        RunPhase::Start,
        RunPhase::CheckingUpdate,
        RunPhase::CheckingTime,
        RunPhase::Dispatching,
        RunPhase::DoneUpdateReceived,
        RunPhase::DoneReminderSent,
        RunPhase::Aborted,
    ];

    #[test]
    fn terminal_phases_have_no_successors() {
        let terminals: Vec<RunPhase> = ALL_PHASES.into_iter().filter(|phase| phase.is_terminal()).collect();
        assert_eq!(
            terminals,
            vec![RunPhase::DoneUpdateReceived, RunPhase::DoneReminderSent, RunPhase::Aborted]
        );
    }

    #[test]
    fn time_check_cannot_abort() {
        assert!(!RunPhase::CheckingTime.can_transition_to(RunPhase::Aborted));
        assert!(RunPhase::CheckingTime.can_transition_to(RunPhase::Dispatching));
    }

    #[test]
    fn transition_graph_is_acyclic() {
        fn visit(phase: RunPhase, path: &mut Vec<RunPhase>) {
            assert!(!path.contains(&phase), "cycle through {phase}");
            path.push(phase);
            for next in phase.allowed_next() {
                visit(*next, path);
            }
            path.pop();
        }
        visit(RunPhase::Start, &mut Vec::new());
    }

    #[test]
    fn only_success_terminals_carry_reasons() {
        assert_eq!(RunPhase::DoneUpdateReceived.terminal_reason(), Some(TerminalReason::UpdateAlreadyReceived));
        assert_eq!(RunPhase::DoneReminderSent.terminal_reason(), Some(TerminalReason::ReminderSent));
        assert_eq!(RunPhase::Aborted.terminal_reason(), None);
        assert_eq!(RunPhase::Dispatching.terminal_reason(), None);
    }

    #[test]
    fn report_serializes_with_screaming_enums() {
        let report = RunReport {
            final_phase: RunPhase::DoneReminderSent,
            terminal_reason: Some(TerminalReason::ReminderSent),
            reminder_channel: ReminderChannel::Slack,
            update_received: Some(false),
            current_time: None,
            failure: None,
            transitions: Vec::new(),
        };
        let value = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(value["finalPhase"], "DONE_REMINDER_SENT");
        assert_eq!(value["terminalReason"], "REMINDER_SENT");
        assert_eq!(value["reminderChannel"], "SLACK");
        assert_eq!(value["updateReceived"], false);
    }
}
