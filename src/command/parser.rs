//! Interpret spoken commands into structured intents
//!
//! Classification is a fixed, ordered table of rules. Each rule pairs a cheap
//! substring predicate with an extractor, and the first predicate that matches
//! decides the intent. Extraction never fails: missing markers or unreadable
//! times degrade to default titles and absent fields.

use crate::command::time::{try_parse_time, tomorrow_morning};
use crate::core::types::EpochMillis;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Reminder fields pulled out of a "remind me ..." utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReminder {
    pub title: String,
    /// Raw time text, or "Tomorrow 9:00" for the tomorrow shortcut
    pub details: Option<String>,
    pub time_millis: Option<EpochMillis>,
}

/// Item placement pulled out of an "i kept my ..." utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLocation {
    pub title: String,
    pub details: Option<String>,
}

/// What the speaker asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Store a task, optionally with an alarm
    CreateReminder(ParsedReminder),
    /// Remember where an object was left
    SaveLocation(ParsedLocation),
    /// Look up an object or reminder by name
    Query(String),
    /// Nothing matched
    Unrecognized,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::CreateReminder(_) => "create-reminder",
            Intent::SaveLocation(_) => "save-location",
            Intent::Query(_) => "query",
            Intent::Unrecognized => "unrecognized",
        }
    }
}

/// Phrases stripped from reminder titles, in removal order
const REMINDER_PREFIXES: [&str; 2] = ["remind me to", "remind me"];

/// Phrases that mark an item-location statement, most specific first
const KEEP_MARKERS: [&str; 6] = [
    "i kept my",
    "i kept the",
    "kept my",
    "kept the",
    "placed my",
    "placed the",
];

/// Phrases that classify an utterance as an item-location statement
const KEEP_TRIGGERS: [&str; 5] = ["i kept", "kept my", "kept the", "placed my", "placed the"];

/// Phrases stripped from queries, in removal order
const QUERY_FILLERS: [&str; 4] = ["where is", "where are", "my", "the"];

const TOMORROW_DETAILS: &str = "Tomorrow 9:00";

/// One classification rule: if `matches` accepts the utterance, `extract` builds the intent
pub struct Rule<Tz: TimeZone> {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub extract: fn(&str, &DateTime<Tz>) -> Intent,
}

/// The classification table, in priority order
pub fn rules<Tz: TimeZone>() -> [Rule<Tz>; 3] {
    [
        Rule {
            name: "create-reminder",
            matches: |u| u.contains("remind me") || u.contains("remind"),
            extract: |u, now| Intent::CreateReminder(parse_reminder(u, now)),
        },
        Rule {
            name: "save-location",
            matches: |u| KEEP_TRIGGERS.iter().any(|t| u.contains(t)),
            extract: |u, _| Intent::SaveLocation(parse_location(u)),
        },
        Rule {
            name: "query",
            matches: |u| u.contains("where is") || u.contains("where are") || u.starts_with("where"),
            extract: |u, _| Intent::Query(extract_query(u)),
        },
    ]
}

/// Classify a lowercased utterance and extract its fields
///
/// `now` anchors any relative times ("at 8 pm", "tomorrow"), so two calls with
/// the same utterance and instant always agree.
pub fn interpret<Tz: TimeZone>(utterance: &str, now: &DateTime<Tz>) -> Intent {
    rules::<Tz>()
        .iter()
        .find(|rule| (rule.matches)(utterance))
        .map(|rule| (rule.extract)(utterance, now))
        .unwrap_or(Intent::Unrecognized)
}

/// Extract title, details and alarm time from a reminder request
pub fn parse_reminder<Tz: TimeZone>(lower: &str, now: &DateTime<Tz>) -> ParsedReminder {
    let (title, details, time_millis) = if let Some((before, after)) = lower.split_once(" at ") {
        let title = strip_phrases(before, &REMINDER_PREFIXES);
        (title, Some(after.to_string()), try_parse_time(after, now))
    } else if lower.contains(" tomorrow") {
        let title = strip_phrases(lower, &["remind me to", "remind me", "tomorrow"]);
        (title, Some(TOMORROW_DETAILS.to_string()), tomorrow_morning(now))
    } else {
        (strip_phrases(lower, &REMINDER_PREFIXES), None, None)
    };

    ParsedReminder {
        title: capitalize_first(sanitize(&title).trim()),
        details,
        time_millis,
    }
}

/// Extract the object and where it was left
pub fn parse_location(lower: &str) -> ParsedLocation {
    let mut title = "item".to_string();
    let mut details = None;

    if let Some(marker) = KEEP_MARKERS.iter().find(|m| lower.contains(*m)) {
        let start = lower.find(marker).map(|i| i + marker.len()).unwrap_or(lower.len());
        let after = lower[start..].trim();

        if let Some((object, place)) = after.split_once(" in ") {
            title = capitalize_first(object.trim());
            details = Some(format!("in {}", place.trim()));
        } else if let Some((object, place)) = after.split_once(" on ") {
            title = capitalize_first(object.trim());
            details = Some(format!("on {}", place.trim()));
        } else {
            title = after.split_whitespace().next().unwrap_or("item").to_string();
            details = Some(after.to_string());
        }
    }

    ParsedLocation {
        title: sanitize(&title),
        details,
    }
}

/// Reduce a "where is ..." question to the object name
///
/// Fillers are removed as raw substrings, so words containing them are cut too.
pub fn extract_query(lower: &str) -> String {
    strip_phrases(lower, &QUERY_FILLERS).trim().to_string()
}

/// Remove the first occurrence of each phrase, in order, and trim
fn strip_phrases(text: &str, phrases: &[&str]) -> String {
    phrases
        .iter()
        .fold(text.to_string(), |acc, phrase| acc.replacen(phrase, "", 1))
        .trim()
        .to_string()
}

/// Keep only ASCII letters, digits and spaces
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        Some(first) => std::iter::once(first).chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .unwrap()
    }

    fn hour_minute(millis: EpochMillis) -> (u32, u32) {
        let t = FixedOffset::east_opt(0)
            .unwrap()
            .timestamp_millis_opt(millis)
            .unwrap();
        (t.hour(), t.minute())
    }

    #[test]
    fn test_reminder_with_time() {
        let intent = interpret("remind me to take medicine at 8 pm", &now());
        let Intent::CreateReminder(parsed) = intent else {
            panic!("expected a reminder intent");
        };
        assert_eq!(parsed.title, "Take medicine");
        assert_eq!(parsed.details.as_deref(), Some("8 pm"));
        assert_eq!(hour_minute(parsed.time_millis.unwrap()), (20, 0));
    }

    #[test]
    fn test_reminder_with_unparseable_time_keeps_details() {
        let parsed = parse_reminder("remind me to call mom!!! at 9am", &now());
        assert_eq!(parsed.title, "Call mom");
        assert_eq!(parsed.details.as_deref(), Some("9am"));
        assert_eq!(parsed.time_millis, None);
    }

    #[test]
    fn test_reminder_splits_on_first_at() {
        let parsed = parse_reminder("remind me to look at the stars at 9 pm", &now());
        assert_eq!(parsed.title, "Look");
        assert_eq!(parsed.details.as_deref(), Some("the stars at 9 pm"));
        assert_eq!(parsed.time_millis, None);
    }

    #[test]
    fn test_reminder_tomorrow() {
        let parsed = parse_reminder("remind me to water the plants tomorrow", &now());
        assert_eq!(parsed.title, "Water the plants");
        assert_eq!(parsed.details.as_deref(), Some("Tomorrow 9:00"));
        let expected = now()
            .timezone()
            .with_ymd_and_hms(2024, 5, 2, 9, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(parsed.time_millis, Some(expected));
    }

    #[test]
    fn test_reminder_tomorrow_requires_leading_space() {
        let parsed = parse_reminder("remind tomorrow", &now());
        assert_eq!(parsed.details.as_deref(), Some("Tomorrow 9:00"));

        let parsed = parse_reminder("tomorrow remind me", &now());
        assert_eq!(parsed.details, None);
        assert_eq!(parsed.title, "Tomorrow");
    }

    #[test]
    fn test_reminder_without_time() {
        let parsed = parse_reminder("remind me to buy bread", &now());
        assert_eq!(parsed.title, "Buy bread");
        assert_eq!(parsed.details, None);
        assert_eq!(parsed.time_millis, None);
    }

    #[test]
    fn test_reminder_prefixes_removed_once_each() {
        let parsed = parse_reminder("remind me to remind me to stretch", &now());
        assert_eq!(parsed.title, "To stretch");
    }

    #[test]
    fn test_reminder_title_leading_digit() {
        let parsed = parse_reminder("remind me to 3 calls", &now());
        assert_eq!(parsed.title, "3 calls");
    }

    #[test]
    fn test_location_on() {
        let intent = interpret("i kept my glasses on the table", &now());
        assert_eq!(
            intent,
            Intent::SaveLocation(ParsedLocation {
                title: "Glasses".into(),
                details: Some("on the table".into()),
            })
        );
    }

    #[test]
    fn test_location_in_takes_priority_over_on() {
        let parsed = parse_location("i kept my ring on the shelf in the hall");
        assert_eq!(parsed.title, "Ring on the shelf");
        assert_eq!(parsed.details.as_deref(), Some("in the hall"));
    }

    #[test]
    fn test_location_fallback_first_token() {
        let parsed = parse_location("i placed the remote beside the tv");
        assert_eq!(parsed.title, "remote");
        assert_eq!(parsed.details.as_deref(), Some("remote beside the tv"));
    }

    #[test]
    fn test_location_fallback_empty_after() {
        let parsed = parse_location("kept my");
        assert_eq!(parsed.title, "item");
        assert_eq!(parsed.details.as_deref(), Some(""));
    }

    #[test]
    fn test_location_without_marker() {
        let intent = interpret("i kept it somewhere", &now());
        assert_eq!(
            intent,
            Intent::SaveLocation(ParsedLocation {
                title: "item".into(),
                details: None,
            })
        );
    }

    #[test]
    fn test_location_strips_punctuation() {
        let parsed = parse_location("i kept the car-keys, in the drawer.");
        assert_eq!(parsed.title, "Carkeys");
        assert_eq!(parsed.details.as_deref(), Some("in the drawer."));
    }

    #[test]
    fn test_query() {
        assert_eq!(
            interpret("where are my keys", &now()),
            Intent::Query("keys".into())
        );
        assert_eq!(
            interpret("where is the remote", &now()),
            Intent::Query("remote".into())
        );
    }

    #[test]
    fn test_query_substring_removal() {
        assert_eq!(extract_query("where did they go"), "where did y go");
        assert_eq!(extract_query("where is mystery box"), "stery box");
    }

    #[test]
    fn test_query_starts_with_where() {
        assert_eq!(
            interpret("wherever", &now()),
            Intent::Query("wherever".into())
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(interpret("hello there", &now()), Intent::Unrecognized);
        assert_eq!(interpret("", &now()), Intent::Unrecognized);
    }

    #[test]
    fn test_remind_has_priority() {
        let intent = interpret("where are my keys remind me", &now());
        assert_eq!(intent.label(), "create-reminder");
        let intent = interpret("i kept my pills, remind me to take them", &now());
        assert_eq!(intent.label(), "create-reminder");
    }

    #[test]
    fn test_kept_beats_where() {
        let intent = interpret("where i kept my hat on the hook", &now());
        assert_eq!(intent.label(), "save-location");
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = rules::<FixedOffset>().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["create-reminder", "save-location", "query"]);
    }

    #[test]
    fn test_intent_serialization() {
        let json = serde_json::to_string(&Intent::Query("keys".into())).unwrap();
        assert_eq!(json, r#"{"intent":"QUERY","value":"keys"}"#);
        let json = serde_json::to_string(&Intent::Unrecognized).unwrap();
        assert_eq!(json, r#"{"intent":"UNRECOGNIZED"}"#);
    }
}
