//! Configuration IO helpers.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use nudge_util::{expand_tilde, interpolate_string};

use crate::config::{ConfigError, NudgeConfig, validate_config};

/// Environment variable overriding the configuration location.
pub const CONFIG_PATH_ENV_VAR: &str = "NUDGE_CONFIG_PATH";

/// Returns the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("nudge").join("config.json")
}

/// Loads, interpolates, and validates the configuration at `path`.
pub fn load_config_from_path(path: &Path) -> Result<NudgeConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    let mut config: NudgeConfig = serde_json::from_str(&content)?;
    config.for_each_string_mut(|value| -> Result<(), ConfigError> {
        *value = interpolate_string(value)?;
        Ok(())
    })?;
    validate_config(&config)?;
    Ok(config)
}
