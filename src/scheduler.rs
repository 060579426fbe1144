//! Fire-once alarms
//!
//! Each alarm is a tokio task that sleeps until its wall-clock instant and then
//! sends an `AlarmNotification` down a channel. Whoever owns the `AlarmReceiver`
//! decides how to present it.

use crate::core::error::{ReminderError, Result};
use crate::core::types::{EpochMillis, ReminderId};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Delivered when an alarm fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmNotification {
    pub title: String,
    pub details: String,
}

impl AlarmNotification {
    /// Build a notification, defaulting an empty title to "Reminder"
    pub fn new(title: &str, details: &str) -> Self {
        let title = if title.is_empty() { "Reminder" } else { title };
        Self {
            title: title.to_string(),
            details: details.to_string(),
        }
    }
}

impl std::fmt::Display for AlarmNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.title, self.details)
    }
}

pub trait Scheduler {
    /// Arrange for one notification at `at_millis`; past instants fire immediately.
    /// Scheduling an id again replaces its earlier alarm.
    fn schedule_once(
        &self,
        id: ReminderId,
        at_millis: EpochMillis,
        title: &str,
        details: &str,
    ) -> Result<()>;

    /// Drop the pending alarm for `id`; returns whether one was waiting
    fn cancel(&self, id: ReminderId) -> Result<bool>;
}

/// Timer-backed scheduler running on a tokio runtime
pub struct TokioScheduler {
    handle: Handle,
    sender: mpsc::UnboundedSender<AlarmNotification>,
    pending: Mutex<HashMap<ReminderId, AbortHandle>>,
}

/// Receiving half of the alarm channel
pub struct AlarmReceiver {
    receiver: mpsc::UnboundedReceiver<AlarmNotification>,
}

impl AlarmReceiver {
    pub async fn recv(&mut self) -> Option<AlarmNotification> {
        self.receiver.recv().await
    }
}

impl TokioScheduler {
    /// Create a scheduler spawning onto `handle`, plus the receiver for its alarms
    pub fn new(handle: Handle) -> (Self, AlarmReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            handle,
            sender,
            pending: Mutex::new(HashMap::new()),
        };
        (scheduler, AlarmReceiver { receiver })
    }
}

/// How long to wait from now until `at_millis`, zero if already past
pub fn delay_until(at_millis: EpochMillis, now_millis: EpochMillis) -> Duration {
    Duration::from_millis(at_millis.saturating_sub(now_millis).max(0) as u64)
}

impl Scheduler for TokioScheduler {
    fn schedule_once(
        &self,
        id: ReminderId,
        at_millis: EpochMillis,
        title: &str,
        details: &str,
    ) -> Result<()> {
        if self.sender.is_closed() {
            return Err(ReminderError::Schedule("alarm receiver is closed".into()));
        }

        let delay = delay_until(at_millis, Utc::now().timestamp_millis());
        let notification = AlarmNotification::new(title, details);
        let sender = self.sender.clone();
        tracing::info!(
            %id,
            title = %notification.title,
            delay_secs = delay.as_secs(),
            "Alarm scheduled"
        );

        let mut pending = self
            .pending
            .lock()
            .map_err(|_| ReminderError::Schedule("pending alarms poisoned".into()))?;
        pending.retain(|_, task| !task.is_finished());

        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(notification).is_err() {
                tracing::warn!("Alarm fired but nobody is listening");
            }
        });
        if let Some(previous) = pending.insert(id, task.abort_handle()) {
            previous.abort();
        }
        Ok(())
    }

    fn cancel(&self, id: ReminderId) -> Result<bool> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| ReminderError::Schedule("pending alarms poisoned".into()))?;
        match pending.remove(&id) {
            Some(task) => {
                let waiting = !task.is_finished();
                task.abort();
                if waiting {
                    tracing::info!(%id, "Alarm cancelled");
                }
                Ok(waiting)
            }
            None => Ok(false),
        }
    }
}

type AlarmLog = Vec<(ReminderId, EpochMillis, AlarmNotification)>;

/// Remembers requested alarms without firing them
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    alarms: Mutex<AlarmLog>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alarms still pending, in the order they were requested
    pub fn alarms(&self) -> Vec<(EpochMillis, AlarmNotification)> {
        self.alarms
            .lock()
            .map(|a| a.iter().map(|(_, at, n)| (*at, n.clone())).collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, AlarmLog>> {
        self.alarms
            .lock()
            .map_err(|_| ReminderError::Schedule("alarm list poisoned".into()))
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule_once(
        &self,
        id: ReminderId,
        at_millis: EpochMillis,
        title: &str,
        details: &str,
    ) -> Result<()> {
        let mut alarms = self.lock()?;
        alarms.retain(|(existing, _, _)| *existing != id);
        alarms.push((id, at_millis, AlarmNotification::new(title, details)));
        Ok(())
    }

    fn cancel(&self, id: ReminderId) -> Result<bool> {
        let mut alarms = self.lock()?;
        let before = alarms.len();
        alarms.retain(|(existing, _, _)| *existing != id);
        Ok(alarms.len() != before)
    }
}

impl<T: Scheduler + ?Sized> Scheduler for &T {
    fn schedule_once(
        &self,
        id: ReminderId,
        at_millis: EpochMillis,
        title: &str,
        details: &str,
    ) -> Result<()> {
        (**self).schedule_once(id, at_millis, title, details)
    }

    fn cancel(&self, id: ReminderId) -> Result<bool> {
        (**self).cancel(id)
    }
}
