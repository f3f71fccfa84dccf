//! Timestamp sub-grammar
//!
//! Exposes exactly two things to the rest of the grammar: a pattern fragment
//! embedded in the `timestamp` rule, and a parse function that maps a matched
//! substring to a structured payload. The planning rule delegates the text
//! after its `DEADLINE:`/`SCHEDULED:`/`CLOSED:` prefix here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::org::token::{CalendarDate, ClockTime, Timestamp};

// Capture groups: 1 delimiter, 2-4 date, 5-6 start time, 7-8 end time,
// 9 repeater. The weekday between date and time is matched but not captured.
const PATTERN: &str = r"([<\[])(\d{4})-(\d{2})-(\d{2})(?:\s+[A-Za-z]+)?(?:\s+(\d{1,2}):(\d{2})(?:-(\d{1,2}):(\d{2}))?)?(?:\s+(\.?\+{1,2}\d+[hdwmy]))?[>\]]";

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| Regex::new(PATTERN).unwrap());

/// The pattern fragment recognizing one timestamp.
///
/// `<...>` is an active timestamp, `[...]` an inactive one. The fragment is
/// deliberately unanchored so a rule can find a timestamp anywhere in a line.
pub fn pattern() -> &'static str {
    PATTERN
}

/// Parse the first timestamp in `input` into its structured payload.
///
/// Returns `None` when `input` contains no timestamp.
pub fn parse(input: &str) -> Option<Timestamp> {
    let caps = TIMESTAMP.captures(input)?;

    let active = &caps[1] == "<";
    let date = CalendarDate {
        year: caps[2].parse().ok()?,
        month: caps[3].parse().ok()?,
        day: caps[4].parse().ok()?,
    };
    let time = match (caps.get(5), caps.get(6)) {
        (Some(hour), Some(minute)) => Some(ClockTime {
            hour: hour.as_str().parse().ok()?,
            minute: minute.as_str().parse().ok()?,
        }),
        _ => None,
    };
    let end_time = match (caps.get(7), caps.get(8)) {
        (Some(hour), Some(minute)) => Some(ClockTime {
            hour: hour.as_str().parse().ok()?,
            minute: minute.as_str().parse().ok()?,
        }),
        _ => None,
    };
    let repeater = caps.get(9).map(|m| m.as_str().to_string());

    Some(Timestamp {
        active,
        date,
        time,
        end_time,
        repeater,
    })
}
