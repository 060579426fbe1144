//! Reminder persistence
//!
//! Records are kept in insertion order; ids grow monotonically from 1 and are
//! never reused, even after deletes.

pub mod json;

pub use json::JsonFileStore;

use crate::core::error::Result;
use crate::core::types::{schedule_order, NewReminder, Reminder, ReminderId};

/// Keyed record store backing the assistant
pub trait ReminderStore {
    /// Persist a record and return its new id
    fn insert(&mut self, reminder: NewReminder) -> Result<ReminderId>;

    /// First record (in insertion order) whose title contains `pattern`,
    /// compared ASCII case-insensitively
    fn find_by_title(&self, pattern: &str) -> Result<Option<Reminder>>;

    /// All records, timed ones by ascending time, untimed ones last
    fn all(&self) -> Result<Vec<Reminder>>;

    /// Remove a record; returns whether it existed
    fn delete(&mut self, id: ReminderId) -> Result<bool>;
}

impl<T: ReminderStore + ?Sized> ReminderStore for Box<T> {
    fn insert(&mut self, reminder: NewReminder) -> Result<ReminderId> {
        (**self).insert(reminder)
    }

    fn find_by_title(&self, pattern: &str) -> Result<Option<Reminder>> {
        (**self).find_by_title(pattern)
    }

    fn all(&self) -> Result<Vec<Reminder>> {
        (**self).all()
    }

    fn delete(&mut self, id: ReminderId) -> Result<bool> {
        (**self).delete(id)
    }
}

/// Shared title matching used by every backend
pub fn title_matches(title: &str, pattern: &str) -> bool {
    title
        .to_ascii_lowercase()
        .contains(&pattern.to_ascii_lowercase())
}

/// In-memory store, used by tests and one-shot runs without persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Reminder>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from previously saved records
    ///
    /// `last_id` is the highest id ever handed out; deleted ids stay retired.
    pub fn from_parts(mut records: Vec<Reminder>, last_id: i64) -> Self {
        records.sort_by_key(|r| r.id);
        let newest = records.last().map(|r| r.id.0).unwrap_or(0);
        Self {
            records,
            last_id: last_id.max(newest),
        }
    }

    pub fn records(&self) -> &[Reminder] {
        &self.records
    }

    pub fn last_id(&self) -> i64 {
        self.last_id
    }
}

impl ReminderStore for MemoryStore {
    fn insert(&mut self, reminder: NewReminder) -> Result<ReminderId> {
        self.last_id += 1;
        let id = ReminderId(self.last_id);
        self.records.push(reminder.with_id(id));
        Ok(id)
    }

    fn find_by_title(&self, pattern: &str) -> Result<Option<Reminder>> {
        Ok(self
            .records
            .iter()
            .find(|r| title_matches(&r.title, pattern))
            .cloned())
    }

    fn all(&self) -> Result<Vec<Reminder>> {
        let mut list = self.records.clone();
        list.sort_by(schedule_order);
        Ok(list)
    }

    fn delete(&mut self, id: ReminderId) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        Ok(self.records.len() != before)
    }
}
