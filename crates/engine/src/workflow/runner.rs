//! Enum-driven state machine that composes the workflow steps.
//!
//! A run starts in [`RunPhase::Start`] and moves through the phases allowed by
//! [`RunPhase::allowed_next`] until it reaches a terminal phase. Every phase is visited at
//! most once; failures are never retried here; a scheduler that wants another attempt
//! calls [`ReminderWorkflow::run_once`] again.

use std::sync::Arc;

use chrono::Utc;
use nudge_types::{PhaseTransition, ReminderChannel, RunFailure, RunPhase, RunReport, TerminalReason};
use tracing::{debug, info, warn};

use crate::{
    Clock, ReminderDispatchStep, ReminderDispatcher, RunError, TimeCheckStep, UpdateCheckStep, UpdateStatusSource,
    WorkflowConfig, WorkflowState,
};

/// The reminder workflow with its collaborators bound.
///
/// The workflow holds no per-run data, so a single instance can serve any number of
/// sequential or concurrent runs.
pub struct ReminderWorkflow {
    recipient: String,
    update_check: UpdateCheckStep,
    time_check: TimeCheckStep,
    reminder_dispatch: ReminderDispatchStep,
}

impl ReminderWorkflow {
    pub fn new(
        config: WorkflowConfig,
        update_source: Arc<dyn UpdateStatusSource>,
        dispatcher: Arc<dyn ReminderDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let message = config.reminder_message();
        Self {
            update_check: UpdateCheckStep::new(update_source, config.step_timeout),
            time_check: TimeCheckStep::new(clock),
            reminder_dispatch: ReminderDispatchStep::new(dispatcher, config.cutoff, message, config.step_timeout),
            recipient: config.recipient,
        }
    }

    /// Executes one pass through the state machine and reports how it ended.
    pub async fn run_once(&self) -> RunOutcome {
        let mut state = WorkflowState::new(self.recipient.clone());
        let mut transitions = Vec::new();
        let mut error: Option<RunError> = None;
        let mut phase = RunPhase::Start;

        while !phase.is_terminal() {
            let next = match phase {
                RunPhase::Start => RunPhase::CheckingUpdate,
                RunPhase::CheckingUpdate => match self.update_check.run(&mut state).await {
                    Ok(()) if state.update_received == Some(true) => RunPhase::DoneUpdateReceived,
                    Ok(()) => RunPhase::CheckingTime,
                    Err(failure) => {
                        error = Some(failure.into());
                        RunPhase::Aborted
                    }
                },
                RunPhase::CheckingTime => {
                    self.time_check.run(&mut state);
                    RunPhase::Dispatching
                }
                RunPhase::Dispatching => match self.reminder_dispatch.run(&mut state).await {
                    Ok(()) => RunPhase::DoneReminderSent,
                    Err(failure) => {
                        error = Some(failure.into());
                        RunPhase::Aborted
                    }
                },
                RunPhase::DoneUpdateReceived | RunPhase::DoneReminderSent | RunPhase::Aborted => break,
            };

            debug_assert!(phase.can_transition_to(next), "illegal transition {phase} -> {next}");
            debug!(from = %phase, to = %next, "workflow transition");
            transitions.push(PhaseTransition {
                from: phase,
                to: next,
                at: Utc::now(),
            });
            state.terminal_reason = next.terminal_reason();
            phase = next;
        }

        match &error {
            Some(error) => warn!(phase = %phase, step = %error.step(), %error, "workflow run aborted"),
            None => info!(phase = %phase, channel = %state.reminder_channel, "workflow run finished"),
        }

        RunOutcome {
            phase,
            state,
            transitions,
            error,
        }
    }
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Terminal phase the run stopped in.
    pub phase: RunPhase,
    /// State as it stood when the run stopped.
    pub state: WorkflowState,
    /// Every transition taken, in order.
    pub transitions: Vec<PhaseTransition>,
    /// Present exactly when `phase` is [`RunPhase::Aborted`].
    pub error: Option<RunError>,
}

impl RunOutcome {
    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        self.state.terminal_reason
    }

    pub fn reminder_channel(&self) -> ReminderChannel {
        self.state.reminder_channel
    }

    pub fn is_aborted(&self) -> bool {
        self.phase == RunPhase::Aborted
    }

    /// Phases visited, starting with [`RunPhase::Start`].
    pub fn visited_phases(&self) -> Vec<RunPhase> {
        std::iter::once(RunPhase::Start)
            .chain(self.transitions.iter().map(|transition| transition.to))
            .collect()
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            final_phase: self.phase,
            terminal_reason: self.state.terminal_reason,
            reminder_channel: self.state.reminder_channel,
            update_received: self.state.update_received,
            current_time: self.state.current_time,
            failure: self.error.as_ref().map(|error| RunFailure {
                step: error.step(),
                message: error.to_string(),
                timed_out: error.is_timeout(),
            }),
            transitions: self.transitions.clone(),
        }
    }
}
