use std::{sync::Arc, time::Duration};

use tracing::{debug, info};

use super::within_deadline;
use crate::{UpdateStatusSource, UpstreamQueryError, WorkflowState};

/// Asks the update-status collaborator whether today's update has arrived.
pub struct UpdateCheckStep {
    source: Arc<dyn UpdateStatusSource>,
    timeout: Option<Duration>,
}

impl UpdateCheckStep {
    pub fn new(source: Arc<dyn UpdateStatusSource>, timeout: Option<Duration>) -> Self {
        Self { source, timeout }
    }

    /// Sets `update_received`. On failure the state is left untouched.
    pub async fn run(&self, state: &mut WorkflowState) -> Result<(), UpstreamQueryError> {
        debug_assert!(state.update_received.is_none(), "update check runs once per state");
        debug!(recipient = %state.recipient, "checking for today's work update");

        let received = within_deadline(
            self.timeout,
            self.source.has_update_today(&state.recipient),
            UpstreamQueryError::timeout,
        )
        .await?;

        info!(update_received = received, "update check finished");
        state.update_received = Some(received);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubUpdateSource;

    #[tokio::test]
    async fn records_negative_answer() {
        let source = Arc::new(StubUpdateSource::answering(false));
        let step = UpdateCheckStep::new(source.clone(), None);
        let mut state = WorkflowState::new("alice");

        step.run(&mut state).await.expect("update check");

        assert_eq!(state.update_received, Some(false));
        assert_eq!(source.users(), vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn failure_leaves_field_unset() {
        let step = UpdateCheckStep::new(
            Arc::new(StubUpdateSource::failing(UpstreamQueryError::unreachable("dns"))),
            None,
        );
        let mut state = WorkflowState::new("alice");

        let error = step.run(&mut state).await.expect_err("unreachable");

        assert_eq!(error, UpstreamQueryError::unreachable("dns"));
        assert_eq!(state.update_received, None);
    }
}
