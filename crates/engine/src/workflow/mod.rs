//! The reminder workflow: configuration, per-run state, and the state machine that drives
//! the steps.

pub mod config;
pub mod runner;
pub mod state;
