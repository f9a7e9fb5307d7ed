//! In-memory collaborators for engine tests.

use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use nudge_types::ReminderChannel;

use crate::{Clock, DispatchError, ReminderDispatcher, UpdateStatusSource, UpstreamQueryError};

/// `HH:MM:SS` on a fixed date in UTC.
pub(crate) fn at(time: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(&format!("2024-03-04T{time}+00:00")).expect("valid test timestamp")
}

/// Answers every query the same way and records which users were asked about.
pub(crate) struct StubUpdateSource {
    answer: Result<bool, UpstreamQueryError>,
    delay: Option<Duration>,
    users: Mutex<Vec<String>>,
}

impl StubUpdateSource {
    pub(crate) fn answering(received: bool) -> Self {
        Self {
            answer: Ok(received),
            delay: None,
            users: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(error: UpstreamQueryError) -> Self {
        Self {
            answer: Err(error),
            delay: None,
            users: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.users().len()
    }

    pub(crate) fn users(&self) -> Vec<String> {
        self.users.lock().expect("update source lock").clone()
    }
}

#[async_trait]
impl UpdateStatusSource for StubUpdateSource {
    async fn has_update_today(&self, user: &str) -> Result<bool, UpstreamQueryError> {
        self.users.lock().expect("update source lock").push(user.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer.clone()
    }
}

/// Records every send attempt, successful or not.
pub(crate) struct RecordingDispatcher {
    failure: Option<DispatchError>,
    delay: Option<Duration>,
    sent: Mutex<Vec<(ReminderChannel, String, String)>>,
}

impl RecordingDispatcher {
    pub(crate) fn succeeding() -> Self {
        Self {
            failure: None,
            delay: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(error: DispatchError) -> Self {
        Self {
            failure: Some(error),
            ..Self::succeeding()
        }
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn sent(&self) -> Vec<(ReminderChannel, String, String)> {
        self.sent.lock().expect("dispatcher lock").clone()
    }

    pub(crate) fn channels(&self) -> Vec<ReminderChannel> {
        self.sent().into_iter().map(|(channel, _, _)| channel).collect()
    }
}

#[async_trait]
impl ReminderDispatcher for RecordingDispatcher {
    async fn send(&self, channel: ReminderChannel, recipient: &str, message: &str) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("dispatcher lock")
            .push((channel, recipient.to_string(), message.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Fixed clock that counts how often it is read.
pub(crate) struct CountingClock {
    instant: DateTime<FixedOffset>,
    reads: AtomicUsize,
}

impl CountingClock {
    pub(crate) fn new(instant: DateTime<FixedOffset>) -> Self {
        Self {
            instant,
            reads: AtomicUsize::new(0),
        }
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Clock for CountingClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.instant
    }
}
