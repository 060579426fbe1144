//! Core type definitions used throughout the codebase

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Unique identifier for stored reminders, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderId(pub i64);

impl std::fmt::Display for ReminderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds since the Unix epoch
pub type EpochMillis = i64;

/// What a stored record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    /// Something to do, optionally at a time
    Task,
    /// Where an object was left
    Item,
}

/// A persisted reminder or item location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub kind: ReminderKind,
    pub title: String,
    pub details: Option<String>,
    pub time_millis: Option<EpochMillis>,
}

/// A record before the store has assigned it an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub kind: ReminderKind,
    pub title: String,
    pub details: Option<String>,
    pub time_millis: Option<EpochMillis>,
}

impl NewReminder {
    pub fn task(title: impl Into<String>) -> Self {
        Self {
            kind: ReminderKind::Task,
            title: title.into(),
            details: None,
            time_millis: None,
        }
    }

    pub fn item(title: impl Into<String>) -> Self {
        Self {
            kind: ReminderKind::Item,
            title: title.into(),
            details: None,
            time_millis: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    pub fn with_time(mut self, time_millis: Option<EpochMillis>) -> Self {
        self.time_millis = time_millis;
        self
    }

    pub fn with_id(self, id: ReminderId) -> Reminder {
        Reminder {
            id,
            kind: self.kind,
            title: self.title,
            details: self.details,
            time_millis: self.time_millis,
        }
    }
}

/// Sort key putting timed records first in ascending order, untimed last
pub fn schedule_order(a: &Reminder, b: &Reminder) -> std::cmp::Ordering {
    match (a.time_millis, b.time_millis) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

/// Render epoch millis as local wall-clock text for spoken confirmations
pub fn format_millis(millis: EpochMillis) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(t) => format_instant(&t),
        None => millis.to_string(),
    }
}

/// Weekday, date, time and UTC offset, e.g. "Wed May 01 20:00:00 +00:00 2024"
pub fn format_instant<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format("%a %b %d %H:%M:%S %:z %Y").to_string()
}
