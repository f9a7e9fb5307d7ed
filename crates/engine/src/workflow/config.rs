//! Explicit configuration handed to the workflow at construction.

use std::time::Duration;

use chrono::NaiveTime;

/// Default reminder text. `{recipient}` is replaced with the configured recipient.
pub const DEFAULT_REMINDER_TEMPLATE: &str = "Reminder: Please send your work update via email to {recipient}";

/// Times strictly before the cutoff go to Slack; the cutoff itself and later go to e-mail.
pub fn default_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default()
}

/// Everything a run needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Identity whose update is checked and who receives the reminder.
    pub recipient: String,
    /// Reminder template; see [`DEFAULT_REMINDER_TEMPLATE`].
    pub reminder_template: String,
    /// Slack/e-mail routing threshold in the clock's time zone.
    pub cutoff: NaiveTime,
    /// Deadline applied to each collaborator call. `None` waits indefinitely.
    pub step_timeout: Option<Duration>,
}

impl WorkflowConfig {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            reminder_template: DEFAULT_REMINDER_TEMPLATE.to_string(),
            cutoff: default_cutoff(),
            step_timeout: None,
        }
    }

    pub fn with_cutoff(mut self, cutoff: NaiveTime) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = Some(timeout);
        self
    }

    pub fn with_reminder_template(mut self, template: impl Into<String>) -> Self {
        self.reminder_template = template.into();
        self
    }

    /// The reminder text with the recipient substituted.
    pub fn reminder_message(&self) -> String {
        self.reminder_template.replace("{recipient}", &self.recipient)
    }
}
