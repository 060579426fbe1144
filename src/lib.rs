//! Voice Reminder - spoken reminders, item locations and lookups

pub mod command;
pub mod core;
pub mod scheduler;
pub mod speech;
pub mod store;
