pub mod keystore;
pub mod path_processing;
pub mod redaction;

pub use keystore::interpolation::{
    InterpolationError, SECRETS_BACKEND_ENV_VAR, SecretsBackend, interpolate_string, resolve_secret, secrets_backend, store_secret,
};
pub use path_processing::expand_tilde;
pub use redaction::redact_sensitive;
