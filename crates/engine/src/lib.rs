//! # Nudge Engine
//!
//! The engine decides, once per invocation, whether a user needs a reminder to send
//! their daily work update and, if so, delivers it on the channel appropriate for the
//! time of day.
//!
//! ## Architecture
//!
//! - **`clock`**: the wall-clock provider the routing decision reads
//! - **`collaborators`**: narrow async traits for the update-status and dispatch services
//! - **`steps`**: the update check, time check, and reminder dispatch steps
//! - **`workflow`**: the enum-driven state machine that composes the steps
//!
//! External services are consumed only through the traits in [`collaborators`]; concrete
//! HTTP bindings live in the `nudge-api` crate.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nudge_engine::{ReminderWorkflow, SystemClock, WorkflowConfig};
//!
//! let workflow = ReminderWorkflow::new(
//!     WorkflowConfig::new("alice@example.com"),
//!     update_source,
//!     dispatcher,
//!     Arc::new(SystemClock::local()),
//! );
//! let outcome = workflow.run_once().await;
//! println!("{:?}", outcome.terminal_reason());
//! ```

pub mod clock;
pub mod collaborators;
pub mod error;
pub mod steps;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collaborators::{ReminderDispatcher, UpdateStatusSource};
pub use error::{DispatchError, RunError, UpstreamQueryError};
pub use steps::{ReminderDispatchStep, TimeCheckStep, UpdateCheckStep, choose_channel};
pub use workflow::config::{DEFAULT_REMINDER_TEMPLATE, WorkflowConfig, default_cutoff};
pub use workflow::runner::{ReminderWorkflow, RunOutcome};
pub use workflow::state::WorkflowState;
