use std::{sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, NaiveTime};
use nudge_types::ReminderChannel;
use tracing::{info, warn};

use super::within_deadline;
use crate::{DispatchError, ReminderDispatcher, WorkflowState};

/// Picks the delivery channel for `current_time`.
///
/// Strictly before `cutoff` is Slack; `cutoff` itself and anything later is e-mail.
pub fn choose_channel(current_time: DateTime<FixedOffset>, cutoff: NaiveTime) -> ReminderChannel {
    if current_time.time() < cutoff {
        ReminderChannel::Slack
    } else {
        ReminderChannel::Email
    }
}

/// Routes the reminder to a channel and hands it to the dispatch collaborator.
pub struct ReminderDispatchStep {
    dispatcher: Arc<dyn ReminderDispatcher>,
    cutoff: NaiveTime,
    message: String,
    timeout: Option<Duration>,
}

impl ReminderDispatchStep {
    pub fn new(dispatcher: Arc<dyn ReminderDispatcher>, cutoff: NaiveTime, message: String, timeout: Option<Duration>) -> Self {
        Self {
            dispatcher,
            cutoff,
            message,
            timeout,
        }
    }

    /// Sends the reminder and records the channel. A failed send leaves `reminder_channel`
    /// as `NONE`; the other channel is never tried.
    pub async fn run(&self, state: &mut WorkflowState) -> Result<(), DispatchError> {
        if state.update_received != Some(false) {
            return Err(DispatchError::NotReady {
                missing: "a negative update check",
            });
        }
        let Some(current_time) = state.current_time else {
            return Err(DispatchError::NotReady { missing: "the current time" });
        };

        let channel = choose_channel(current_time, self.cutoff);
        info!(%channel, current_time = %current_time, cutoff = %self.cutoff, "dispatching reminder");

        within_deadline(
            self.timeout,
            self.dispatcher.send(channel, &state.recipient, &self.message),
            |timeout_ms| DispatchError::timeout(channel, timeout_ms),
        )
        .await
        .inspect_err(|error| warn!(%channel, %error, "reminder dispatch failed"))?;

        state.reminder_channel = channel;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingDispatcher, at};

    fn evening() -> NaiveTime {
        NaiveTime::from_hms_opt(21, 0, 0).expect("time")
    }

    #[test]
    fn before_cutoff_routes_to_slack() {
        for time in ["00:00:00", "09:00:00", "14:00:00", "20:59:59"] {
            assert_eq!(choose_channel(at(time), evening()), ReminderChannel::Slack, "{time}");
        }
    }

    #[test]
    fn cutoff_and_later_route_to_email() {
        for time in ["21:00:00", "21:00:01", "22:15:00", "23:59:59"] {
            assert_eq!(choose_channel(at(time), evening()), ReminderChannel::Email, "{time}");
        }
    }

    #[test]
    fn routing_uses_the_timestamps_own_zone() {
        let evening_in_tokyo = DateTime::parse_from_rfc3339("2024-03-04T21:30:00+09:00").expect("timestamp");
        assert_eq!(choose_channel(evening_in_tokyo, evening()), ReminderChannel::Email);
    }

    #[tokio::test]
    async fn refuses_to_dispatch_without_time_check() {
        let dispatcher = Arc::new(RecordingDispatcher::succeeding());
        let step = ReminderDispatchStep::new(dispatcher.clone(), evening(), "hi".into(), None);
        let mut state = WorkflowState::new("alice");
        state.update_received = Some(false);

        let error = step.run(&mut state).await.expect_err("precondition");

        assert_eq!(error, DispatchError::NotReady { missing: "the current time" });
        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn refuses_to_dispatch_when_update_was_received() {
        let dispatcher = Arc::new(RecordingDispatcher::succeeding());
        let step = ReminderDispatchStep::new(dispatcher.clone(), evening(), "hi".into(), None);
        let mut state = WorkflowState::new("alice");
        state.update_received = Some(true);
        state.current_time = Some(at("10:00:00"));

        assert!(step.run(&mut state).await.is_err());
        assert!(dispatcher.sent().is_empty());
        assert_eq!(state.reminder_channel, ReminderChannel::None);
    }
}
