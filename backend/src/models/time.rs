//! Clock-time helpers for the `hhmm` encoding used by the flight table.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Convert an `hhmm` integer (e.g. `1345`) to a clock time.
///
/// `2400` is the table's spelling of midnight at the end of the day and maps
/// to `00:00`. Values with minutes above 59 or hours above 24 are rejected.
pub fn clock_from_hhmm(value: i64) -> Option<NaiveTime> {
    if !(0..=2400).contains(&value) {
        return None;
    }
    let hours = (value / 100) as u32;
    let minutes = (value % 100) as u32;
    if hours == 24 {
        return if minutes == 0 {
            NaiveTime::from_hms_opt(0, 0, 0)
        } else {
            None
        };
    }
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Minutes elapsed since midnight.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

/// Minutes from `start` to `end`, adding a day when `end` is earlier on the
/// clock (an overnight arrival).
pub fn minutes_until(start: NaiveTime, end: NaiveTime) -> u32 {
    let start = minute_of_day(start);
    let end = minute_of_day(end);
    if end < start {
        end + MINUTES_PER_DAY - start
    } else {
        end - start
    }
}

/// Day of week with Monday = 0 through Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Short English weekday label for a Monday-based index.
pub fn weekday_label(index: u8) -> &'static str {
    match index {
        0 => "Mon",
        1 => "Tue",
        2 => "Wed",
        3 => "Thu",
        4 => "Fri",
        5 => "Sat",
        _ => "Sun",
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
