//! Command pipeline
//!
//! Utterance -> `interpret` -> `Intent` -> `Assistant` -> store / scheduler / speech

pub mod executor;
pub mod parser;
pub mod time;

pub use executor::{Assistant, Outcome};
pub use parser::{interpret, Intent, ParsedLocation, ParsedReminder};
