//! Shared vocabulary for the reminder workflow.
//!
//! These types cross crate boundaries: the engine produces them, the HTTP
//! collaborators consume [`ReminderChannel`], and the CLI serializes
//! [`RunReport`] for operators and log shippers.

pub mod workflow;

pub use workflow::{PhaseTransition, ReminderChannel, RunFailure, RunPhase, RunReport, TerminalReason, WorkflowStep};
