//! Command execution - turns interpreted intents into stored records, alarms and replies

use crate::command::parser::{interpret, Intent, ParsedLocation, ParsedReminder};
use crate::core::config::AssistantConfig;
use crate::core::error::{ReminderError, Result};
use crate::core::types::{
    format_instant, EpochMillis, NewReminder, Reminder, ReminderId, ReminderKind,
};
use crate::scheduler::Scheduler;
use crate::speech::SpeechSynthesizer;
use crate::store::ReminderStore;
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

pub const NOT_UNDERSTOOD: &str =
    "Sorry, I didn't understand. Try saying: Remind me to... or I kept my...";
pub const SCHEDULED: &str = "Reminder scheduled.";

/// What happened while handling one utterance
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub intent: Intent,
    /// Id of the record written, if any
    pub stored: Option<ReminderId>,
    /// Record found by a query
    pub found: Option<Reminder>,
    pub scheduled: bool,
    /// Every line spoken back, in order
    pub spoken: Vec<String>,
}

impl Outcome {
    fn new(intent: Intent) -> Self {
        Self {
            intent,
            stored: None,
            found: None,
            scheduled: false,
            spoken: Vec::new(),
        }
    }
}

/// Wires the interpreter to a store, a scheduler and a voice
pub struct Assistant<S, C, V> {
    store: S,
    scheduler: C,
    speaker: V,
    announce_schedule: bool,
}

impl<S, C, V> Assistant<S, C, V>
where
    S: ReminderStore,
    C: Scheduler,
    V: SpeechSynthesizer,
{
    pub fn new(store: S, scheduler: C, speaker: V) -> Self {
        Self {
            store,
            scheduler,
            speaker,
            announce_schedule: true,
        }
    }

    pub fn with_config(mut self, config: &AssistantConfig) -> Self {
        self.announce_schedule = config.announce_schedule;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle raw recognized speech using the local clock
    pub fn handle(&mut self, spoken: &str) -> Result<Outcome> {
        self.handle_at(spoken, &Local::now())
    }

    /// Handle raw recognized speech as if it were `now`
    pub fn handle_at<Tz: TimeZone>(&mut self, spoken: &str, now: &DateTime<Tz>) -> Result<Outcome>
    where
        Tz::Offset: std::fmt::Display,
    {
        let lower = spoken.to_lowercase();
        let intent = interpret(&lower, now);
        tracing::info!(intent = intent.label(), "Heard: {}", spoken);

        let mut outcome = Outcome::new(intent.clone());
        match intent {
            Intent::CreateReminder(parsed) => self.create_reminder(parsed, now, &mut outcome)?,
            Intent::SaveLocation(parsed) => self.save_location(parsed, &mut outcome)?,
            Intent::Query(query) => self.answer_query(&query, &mut outcome)?,
            Intent::Unrecognized => self.speak(&mut outcome, NOT_UNDERSTOOD.to_string()),
        }
        Ok(outcome)
    }

    /// All records, soonest first, untimed last
    pub fn list(&self) -> Result<Vec<Reminder>> {
        self.store.all()
    }

    /// Remove a record and any alarm still waiting for it
    pub fn delete(&mut self, id: ReminderId) -> Result<()> {
        if self.store.delete(id)? {
            tracing::info!(%id, "Reminder deleted");
            self.scheduler.cancel(id)?;
            Ok(())
        } else {
            Err(ReminderError::NotFound(id))
        }
    }

    /// Re-arm alarms for stored tasks that are still in the future
    ///
    /// Alarms live only as long as the process, so this runs at startup.
    pub fn restore_alarms(&self, now_millis: EpochMillis) -> Result<usize> {
        let mut restored = 0;
        for record in self.store.all()? {
            let Some(at) = record.time_millis else {
                continue;
            };
            if record.kind != ReminderKind::Task || at < now_millis {
                continue;
            }
            let details = record.details.as_deref().unwrap_or("");
            self.scheduler
                .schedule_once(record.id, at, &record.title, details)?;
            restored += 1;
        }
        if restored > 0 {
            tracing::info!("Restored {} pending alarm(s)", restored);
        }
        Ok(restored)
    }

    fn create_reminder<Tz: TimeZone>(
        &mut self,
        parsed: ParsedReminder,
        now: &DateTime<Tz>,
        outcome: &mut Outcome,
    ) -> Result<()>
    where
        Tz::Offset: std::fmt::Display,
    {
        let record = NewReminder::task(parsed.title.clone())
            .with_details(parsed.details.clone())
            .with_time(parsed.time_millis);
        let id = self.store.insert(record)?;
        outcome.stored = Some(id);

        let when = parsed
            .time_millis
            .and_then(|ms| now.timezone().timestamp_millis_opt(ms).single())
            .map(|t| format!(" at {}", format_instant(&t)))
            .unwrap_or_default();
        self.speak(outcome, format!("Okay. I'll remind you: {}{}", parsed.title, when));

        if let Some(at) = parsed.time_millis {
            let details = parsed.details.as_deref().unwrap_or("");
            match self.scheduler.schedule_once(id, at, &parsed.title, details) {
                Ok(()) => {
                    outcome.scheduled = true;
                    if self.announce_schedule {
                        self.speak(outcome, SCHEDULED.to_string());
                    }
                }
                Err(e) => tracing::warn!("Could not schedule alarm: {}", e),
            }
        }
        Ok(())
    }

    fn save_location(&mut self, parsed: ParsedLocation, outcome: &mut Outcome) -> Result<()> {
        let record = NewReminder::item(parsed.title.clone()).with_details(parsed.details);
        outcome.stored = Some(self.store.insert(record)?);
        self.speak(outcome, format!("Saved location for {}.", parsed.title));
        Ok(())
    }

    fn answer_query(&mut self, query: &str, outcome: &mut Outcome) -> Result<()> {
        let found = self.store.find_by_title(query)?;
        let answer = match &found {
            Some(record) => describe(record),
            None => format!(
                "I couldn't find that. You can save it by saying, I kept my {} in the ...",
                query
            ),
        };
        outcome.found = found;
        self.speak(outcome, answer);
        Ok(())
    }

    fn speak(&self, outcome: &mut Outcome, text: String) {
        self.speaker.say(&text);
        outcome.spoken.push(text);
    }
}

/// Spoken answer for a found record
fn describe(record: &Reminder) -> String {
    match (record.kind, record.details.as_deref()) {
        (ReminderKind::Item, Some(place)) => format!("You said it's {}", place),
        (ReminderKind::Item, None) => format!("You saved {}, but not where it is.", record.title),
        (ReminderKind::Task, Some(when)) => format!("Reminder: {} at {}", record.title, when),
        (ReminderKind::Task, None) => format!("Reminder: {}", record.title),
    }
}
