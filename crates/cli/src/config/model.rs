//! Data models for the configuration file.

use std::time::Duration;

use chrono::FixedOffset;
use nudge_engine::{DEFAULT_REMINDER_TEMPLATE, SystemClock, WorkflowConfig, default_cutoff};
use nudge_util::InterpolationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::validation::{parse_time_of_day, parse_utc_offset};

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NudgeConfig {
    /// E-mail address whose update is checked and who is reminded.
    pub recipient: String,
    /// Reminder text; `{recipient}` is substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_message: Option<String>,
    /// Routing threshold, `HH:MM` or `HH:MM:SS`. Defaults to 21:00.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<String>,
    /// Fixed zone for the clock, e.g. `+05:30`. Defaults to the host zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
    /// Deadline for each collaborator call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_timeout_secs: Option<u64>,
    pub slack: SlackSettings,
    pub gmail: GmailSettings,
}

/// Slack bot credentials and target conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SlackSettings {
    pub token: String,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Gmail OAuth access token and message conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GmailSettings {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Subject fragment identifying a work update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_subject: Option<String>,
    /// Subject of e-mail reminders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_subject: Option<String>,
}

impl NudgeConfig {
    /// Applies `transform` to every string value that may carry placeholders.
    pub(crate) fn for_each_string_mut<E>(&mut self, mut transform: impl FnMut(&mut String) -> Result<(), E>) -> Result<(), E> {
        transform(&mut self.recipient)?;
        transform(&mut self.slack.token)?;
        transform(&mut self.slack.channel_id)?;
        transform(&mut self.gmail.access_token)?;
        let optional = [
            &mut self.reminder_message,
            &mut self.cutoff,
            &mut self.utc_offset,
            &mut self.slack.base_url,
            &mut self.gmail.base_url,
            &mut self.gmail.update_subject,
            &mut self.gmail.reminder_subject,
        ];
        for value in optional.into_iter().flatten() {
            transform(value)?;
        }
        Ok(())
    }

    pub fn offset(&self) -> Result<Option<FixedOffset>, ConfigError> {
        self.utc_offset.as_deref().map(parse_utc_offset).transpose()
    }

    pub fn clock(&self) -> Result<SystemClock, ConfigError> {
        Ok(match self.offset()? {
            Some(offset) => SystemClock::with_offset(offset),
            None => SystemClock::local(),
        })
    }

    /// Builds the engine configuration.
    pub fn workflow_config(&self) -> Result<WorkflowConfig, ConfigError> {
        let cutoff = match self.cutoff.as_deref() {
            Some(raw) => parse_time_of_day(raw).ok_or_else(|| ConfigError::invalid("cutoff", format!("'{raw}' is not HH:MM[:SS]")))?,
            None => default_cutoff(),
        };
        let mut config = WorkflowConfig::new(self.recipient.trim())
            .with_cutoff(cutoff)
            .with_reminder_template(self.reminder_message.as_deref().unwrap_or(DEFAULT_REMINDER_TEMPLATE));
        if let Some(seconds) = self.step_timeout_secs {
            config = config.with_step_timeout(Duration::from_secs(seconds));
        }
        Ok(config)
    }
}

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
