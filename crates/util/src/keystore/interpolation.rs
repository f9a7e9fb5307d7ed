//! Interpolation of `${env:NAME}` and `${secret:NAME}` placeholders.

use keyring::Entry;
use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

/// Keychain service under which nudge secrets are stored.
const KEYCHAIN_SERVICE: &str = "nudge";
/// Environment variable used to select the secret resolution backend.
pub const SECRETS_BACKEND_ENV_VAR: &str = "NUDGE_SECRETS_BACKEND";

/// Where `${secret:NAME}` placeholders are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretsBackend {
    /// The OS keychain, service `nudge`, account `NAME`.
    Keychain,
    /// The process environment variable `NAME`. Meant for CI and headless hosts.
    Environment,
}

impl SecretsBackend {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("env") => Self::Environment,
            _ => Self::Keychain,
        }
    }

    fn lookup(self, name: &str) -> Result<String, InterpolationError> {
        match self {
            Self::Environment => std::env::var(name).map_err(|error| InterpolationError::MissingSecret {
                name: name.to_string(),
                reason: error.to_string(),
            }),
            Self::Keychain => keychain_entry(name)?
                .get_password()
                .map_err(|error| InterpolationError::MissingSecret {
                    name: name.to_string(),
                    reason: error.to_string(),
                }),
        }
    }
}

/// Backend selected by `NUDGE_SECRETS_BACKEND`; anything but `env` means the keychain.
pub fn secrets_backend() -> SecretsBackend {
    SecretsBackend::parse(std::env::var(SECRETS_BACKEND_ENV_VAR).ok().as_deref())
}

/// Replaces every `${env:NAME}` and `${secret:NAME}` in `value`.
///
/// The first placeholder that cannot be resolved fails the whole value.
pub fn interpolate_string(value: &str) -> Result<String, InterpolationError> {
    let placeholder = Regex::new(r"\$\{(env|secret):([\w.+-]*)\}")?;

    let mut first_error = None;
    let resolved = placeholder.replace_all(value, |caps: &Captures| {
        let name = &caps[2];
        let lookup = match &caps[1] {
            "env" => std::env::var(name).map_err(|_| InterpolationError::MissingEnvVar { name: name.to_string() }),
            _ => resolve_secret(name),
        };
        match lookup {
            Ok(resolved) => {
                debug!(kind = &caps[1], %name, "resolved placeholder");
                resolved
            }
            Err(error) => {
                first_error.get_or_insert(error);
                String::new()
            }
        }
    });

    match first_error {
        Some(error) => Err(error),
        None => Ok(resolved.into_owned()),
    }
}

/// Looks up a single secret through the active backend.
pub fn resolve_secret(name: &str) -> Result<String, InterpolationError> {
    secrets_backend().lookup(name)
}

/// Writes `value` to the OS keychain so configs can reference it as `${secret:NAME}`.
pub fn store_secret(name: &str, value: &str) -> Result<(), InterpolationError> {
    keychain_entry(name)?
        .set_password(value)
        .map_err(|error| InterpolationError::Keychain {
            name: name.to_string(),
            reason: error.to_string(),
        })?;
    debug!(%name, "stored secret in keychain");
    Ok(())
}

fn keychain_entry(name: &str) -> Result<Entry, InterpolationError> {
    Entry::new(KEYCHAIN_SERVICE, name).map_err(|error| InterpolationError::Keychain {
        name: name.to_string(),
        reason: error.to_string(),
    })
}

#[derive(Debug, Error, Clone)]
pub enum InterpolationError {
    #[error("environment variable '{name}' is not set")]
    MissingEnvVar { name: String },

    #[error("secret '{name}' could not be resolved: {reason}")]
    MissingSecret { name: String, reason: String },

    #[error("keychain access for '{name}' failed: {reason}")]
    Keychain { name: String, reason: String },

    #[error("invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_defaults_to_keychain() {
        temp_env::with_var(SECRETS_BACKEND_ENV_VAR, None::<&str>, || {
            assert_eq!(secrets_backend(), SecretsBackend::Keychain);
        });
        temp_env::with_var(SECRETS_BACKEND_ENV_VAR, Some("vault"), || {
            assert_eq!(secrets_backend(), SecretsBackend::Keychain);
        });
    }

    #[test]
    fn env_backend_is_case_insensitive() {
        temp_env::with_var(SECRETS_BACKEND_ENV_VAR, Some(" ENV "), || {
            assert_eq!(secrets_backend(), SecretsBackend::Environment);
        });
    }

    #[test]
    fn interpolates_env_and_secret_placeholders() {
        temp_env::with_vars(
            [
                (SECRETS_BACKEND_ENV_VAR, Some("env")),
                ("NUDGE_TEST_CHANNEL", Some("C0123")),
                ("NUDGE_TEST_SLACK_TOKEN", Some("xoxb-test")),
            ],
            || {
                let resolved = interpolate_string("${env:NUDGE_TEST_CHANNEL}/${secret:NUDGE_TEST_SLACK_TOKEN}").expect("interpolate");
                assert_eq!(resolved, "C0123/xoxb-test");
            },
        );
    }

    #[test]
    fn missing_env_var_is_reported_by_name() {
        temp_env::with_var("NUDGE_TEST_ABSENT", None::<&str>, || {
            let error = interpolate_string("prefix-${env:NUDGE_TEST_ABSENT}").expect_err("missing env var");
            assert!(matches!(error, InterpolationError::MissingEnvVar { ref name } if name == "NUDGE_TEST_ABSENT"));
        });
    }

    #[test]
    fn missing_env_secret_is_reported() {
        temp_env::with_vars(
            [(SECRETS_BACKEND_ENV_VAR, Some("env")), ("NUDGE_TEST_GONE", None)],
            || {
                let error = interpolate_string("${secret:NUDGE_TEST_GONE}").expect_err("missing secret");
                assert!(matches!(error, InterpolationError::MissingSecret { .. }));
            },
        );
    }

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(interpolate_string("alice@example.com").expect("plain"), "alice@example.com");
    }
}
