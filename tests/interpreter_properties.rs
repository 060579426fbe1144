//! Property tests for the command interpreter
//!
//! The interpreter must accept any text without panicking, respect its fixed
//! rule priority, and be a pure function of (utterance, now).

use chrono::{DateTime, FixedOffset, TimeZone, Timelike};
use proptest::prelude::*;
use voice_reminder::command::{interpret, Intent};

fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(-5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 7, 15, hour, minute, 0)
        .unwrap()
}

proptest! {
    #[test]
    fn never_panics(text in ".*") {
        let _ = interpret(&text.to_lowercase(), &at(12, 0));
    }

    #[test]
    fn remind_always_wins(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
        let utterance = format!("{}where is i kept my remind{}", prefix, suffix);
        let is_reminder = matches!(interpret(&utterance, &at(12, 0)), Intent::CreateReminder(_));
        prop_assert!(is_reminder);
    }

    #[test]
    fn same_instant_same_result(text in "[a-z0-9: ]{0,40}", hour in 0u32..24, minute in 0u32..60) {
        let now = at(hour, minute);
        prop_assert_eq!(interpret(&text, &now), interpret(&text, &now));
    }

    #[test]
    fn reminder_titles_are_sanitized(title in "[a-z!?.,' ]{1,30}") {
        let utterance = format!("remind me to {} at 9 pm", title);
        if let Intent::CreateReminder(parsed) = interpret(&utterance, &at(8, 0)) {
            prop_assert!(parsed.title.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '));
        } else {
            prop_assert!(false, "expected a reminder");
        }
    }

    #[test]
    fn parsed_hour_matches_spoken_hour(hour in 1u32..=12, minute in 0u32..60, pm in any::<bool>(), now_hour in 0u32..24) {
        let marker = if pm { "pm" } else { "am" };
        let utterance = format!("remind me to check the oven at {}:{:02} {}", hour, minute, marker);
        let now = at(now_hour, 30);

        let Intent::CreateReminder(parsed) = interpret(&utterance, &now) else {
            return Err(TestCaseError::fail("expected a reminder"));
        };
        let millis = parsed.time_millis.expect("time should parse");
        let fired = now.timezone().timestamp_millis_opt(millis).unwrap();

        let expected_hour = (hour % 12) + if pm { 12 } else { 0 };
        prop_assert_eq!(fired.hour(), expected_hour);
        prop_assert_eq!(fired.minute(), minute);
        prop_assert!(fired >= now);
        prop_assert!(fired < now + chrono::Duration::days(1));
    }
}

#[test]
fn documented_examples() {
    let now = at(12, 0);

    let Intent::CreateReminder(parsed) = interpret("remind me to take medicine at 8 pm", &now) else {
        panic!("expected a reminder intent");
    };
    assert_eq!(parsed.title, "Take medicine");
    assert_eq!(parsed.details.as_deref(), Some("8 pm"));

    let Intent::SaveLocation(parsed) = interpret("i kept my glasses on the table", &now) else {
        panic!("expected a location intent");
    };
    assert_eq!(parsed.title, "Glasses");
    assert_eq!(parsed.details.as_deref(), Some("on the table"));

    assert_eq!(interpret("where are my keys", &now), Intent::Query("keys".into()));
    assert_eq!(interpret("hello there", &now), Intent::Unrecognized);

    let Intent::CreateReminder(parsed) = interpret("remind me to call mom!!! at 9am", &now) else {
        panic!("expected a reminder intent");
    };
    assert!(!parsed.title.contains('!'));
}
