//! The three steps a run can execute.
//!
//! Each step mutates the run's [`WorkflowState`](crate::WorkflowState) through an exclusive
//! borrow and writes only the fields it owns.

mod reminder_dispatch;
mod time_check;
mod update_check;

use std::{future::Future, time::Duration};

pub use reminder_dispatch::{ReminderDispatchStep, choose_channel};
pub use time_check::TimeCheckStep;
pub use update_check::UpdateCheckStep;

/// Awaits `future`, mapping an expired deadline to the caller's timeout error.
async fn within_deadline<T, E>(
    deadline: Option<Duration>,
    future: impl Future<Output = Result<T, E>>,
    on_timeout: impl FnOnce(u64) -> E,
) -> Result<T, E> {
    let Some(deadline) = deadline else {
        return future.await;
    };
    match tokio::time::timeout(deadline, future).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(deadline.as_millis().try_into().unwrap_or(u64::MAX))),
    }
}
