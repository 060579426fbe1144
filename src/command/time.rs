//! Spoken clock-time parsing
//!
//! Accepts the 12-hour forms people actually say ("8 pm", "08 PM", "8:30 am",
//! "10:05 PM") with lenient calendar semantics: surplus hours or minutes roll
//! over instead of failing, and anything after the meridiem is ignored.

use crate::core::types::EpochMillis;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, space0},
    combinator::{map, map_res, value},
    sequence::preceded,
    IResult, Parser,
};

/// Hour used for "tomorrow" reminders that carry no explicit time
pub const TOMORROW_DEFAULT_HOUR: u32 = 9;

/// Hour/minute as read from the text, before calendar normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub pm: bool,
}

impl ClockTime {
    /// Normalize to (hour-of-day, minute), rolling overflow like a lenient calendar
    pub fn hour_minute(&self) -> (u32, u32) {
        // 12 on a 1-12 clock is hour zero of its half-day
        let hour = if self.hour == 12 { 0 } else { self.hour as u64 };
        let hour = hour + if self.pm { 12 } else { 0 };
        let total = hour * 60 + self.minute as u64;
        (((total / 60) % 24) as u32, (total % 60) as u32)
    }
}

type ClockParser = fn(&str) -> IResult<&str, ClockTime>;

/// Patterns tried in order; the first that parses wins
const FORMATS: [(&str, ClockParser); 4] = [
    ("h a", hour_meridiem),
    ("hh a", hour_meridiem),
    ("h:mm a", hour_minute_meridiem),
    ("hh:mm a", hour_minute_meridiem),
];

fn number(input: &str) -> IResult<&str, u32> {
    preceded(space0, map_res(digit1, |digits: &str| digits.parse::<u32>())).parse(input)
}

fn meridiem(input: &str) -> IResult<&str, bool> {
    preceded(
        space0,
        alt((value(false, tag_no_case("AM")), value(true, tag_no_case("PM")))),
    )
    .parse(input)
}

fn hour_meridiem(input: &str) -> IResult<&str, ClockTime> {
    map((number, char(' '), meridiem), |(hour, _, pm)| ClockTime {
        hour,
        minute: 0,
        pm,
    })
    .parse(input)
}

fn hour_minute_meridiem(input: &str) -> IResult<&str, ClockTime> {
    map(
        (number, char(':'), number, char(' '), meridiem),
        |(hour, _, minute, _, pm)| ClockTime { hour, minute, pm },
    )
    .parse(input)
}

/// Read a clock time from the start of `text`, ignoring whatever follows it
pub fn parse_clock(text: &str) -> Option<ClockTime> {
    let upper = text.to_uppercase();
    FORMATS
        .iter()
        .find_map(|(_, format)| format(&upper).ok().map(|(_, clock)| clock))
}

/// Resolve spoken time text to the next matching instant
///
/// The time is placed on `now`'s date; if that is already in the past it moves
/// to the following day. Returns `None` when no format matches or the local
/// time does not exist in `now`'s timezone.
pub fn try_parse_time<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> Option<EpochMillis> {
    let clock = parse_clock(text)?;
    let (hour, minute) = clock.hour_minute();
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;

    let today = now.date_naive();
    let candidate = local_instant(now, today, time)?;
    if candidate < *now {
        let next = local_instant(now, today.succ_opt()?, time)?;
        return Some(next.timestamp_millis());
    }
    Some(candidate.timestamp_millis())
}

/// The next calendar day at the default morning hour, with no rollover check
pub fn tomorrow_morning<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<EpochMillis> {
    let time = NaiveTime::from_hms_opt(TOMORROW_DEFAULT_HOUR, 0, 0)?;
    let tomorrow = now.date_naive().succ_opt()?;
    local_instant(now, tomorrow, time).map(|t| t.timestamp_millis())
}

fn local_instant<Tz: TimeZone>(
    now: &DateTime<Tz>,
    date: NaiveDate,
    time: NaiveTime,
) -> Option<DateTime<Tz>> {
    now.timezone()
        .from_local_datetime(&date.and_time(time))
        .earliest()
}
