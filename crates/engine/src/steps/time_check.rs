use std::sync::Arc;

use tracing::debug;

use crate::{Clock, WorkflowState};

/// Records the moment the routing decision is made.
pub struct TimeCheckStep {
    clock: Arc<dyn Clock>,
}

impl TimeCheckStep {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn run(&self, state: &mut WorkflowState) {
        let now = self.clock.now();
        debug!(current_time = %now, "time check");
        state.current_time = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingClock, at};

    #[test]
    fn writes_clock_reading_into_state() {
        let clock = Arc::new(CountingClock::new(at("14:00:00")));
        let step = TimeCheckStep::new(clock.clone());
        let mut state = WorkflowState::new("alice");

        step.run(&mut state);

        assert_eq!(state.current_time, Some(at("14:00:00")));
        assert_eq!(clock.reads(), 1);
    }
}
