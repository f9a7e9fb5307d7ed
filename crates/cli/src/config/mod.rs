//! Configuration for the `nudge` binary.
//!
//! Handles loading, `${env:…}`/`${secret:…}` interpolation, and validation of
//! `~/.config/nudge/config.json`, and converts the result into the explicit values the
//! engine and the HTTP collaborators are constructed from.

mod io;
mod model;
mod validation;

pub use io::{default_config_path, load_config_from_path};
pub use model::{ConfigError, NudgeConfig};
pub use validation::{parse_time_of_day, validate_config};
