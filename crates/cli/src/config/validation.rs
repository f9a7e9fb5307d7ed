//! Configuration validation.

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use nudge_api::validate_base_url;
use tracing::debug;

use crate::config::{ConfigError, NudgeConfig};

/// Validate the entire configuration after interpolation.
pub fn validate_config(config: &NudgeConfig) -> Result<(), ConfigError> {
    let recipient = config.recipient.trim();
    if recipient.is_empty() {
        return Err(ConfigError::invalid("recipient", "must not be empty"));
    }
    if recipient.chars().any(|character| character.is_whitespace() || character == '"') {
        return Err(ConfigError::invalid("recipient", "must be a bare address without spaces or quotes"));
    }

    require_non_empty("slack.token", &config.slack.token)?;
    require_non_empty("slack.channelId", &config.slack.channel_id)?;
    require_non_empty("gmail.accessToken", &config.gmail.access_token)?;

    if config.step_timeout_secs == Some(0) {
        return Err(ConfigError::invalid("stepTimeoutSecs", "must be greater than zero"));
    }
    if let Some(subject) = &config.gmail.update_subject
        && subject.contains('"')
    {
        return Err(ConfigError::invalid("gmail.updateSubject", "must not contain double quotes"));
    }
    if let Some(subject) = &config.gmail.reminder_subject
        && subject.contains(['\r', '\n'])
    {
        return Err(ConfigError::invalid("gmail.reminderSubject", "must be a single line"));
    }

    config.workflow_config()?;
    config.offset()?;

    for (field, base_url) in [("slack.baseUrl", &config.slack.base_url), ("gmail.baseUrl", &config.gmail.base_url)] {
        if let Some(base_url) = base_url {
            validate_base_url(base_url).map_err(|error| ConfigError::invalid(field, error.to_string()))?;
        }
    }

    debug!(recipient = %recipient, "validated configuration");
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

/// Parses `+HH:MM`, `-HH:MM`, or `Z`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }
    trimmed
        .parse::<FixedOffset>()
        .map_err(|error| ConfigError::invalid("utcOffset", format!("'{trimmed}' is not +HH:MM or -HH:MM: {error}")))
}
