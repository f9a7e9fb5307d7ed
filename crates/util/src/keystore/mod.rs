//! Secret storage and `${...}` placeholder resolution for configuration values.

pub mod interpolation;
