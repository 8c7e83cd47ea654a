//! Time-grouped aggregations: per day, per scheduled hour, per weekday.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::stats::{ratio, screen, Mean};
use crate::api::{DailyTrendPoint, HourlyBucket, WeekdayBucket};
use crate::models::{weekday_label, FlightRecord};

#[derive(Default)]
struct DayAccumulator {
    flights: usize,
    cancelled: usize,
    departure: Mean,
    arrival: Mean,
}

/// Flight volume, delays and cancellation rate per calendar day, dates
/// strictly ascending.
pub fn daily_trend(records: &[&FlightRecord]) -> Vec<DailyTrendPoint> {
    let records = screen(records, "daily_trend");
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for record in records {
        let day = days.entry(record.date).or_default();
        day.flights += 1;
        if record.cancelled {
            day.cancelled += 1;
        } else {
            day.departure.push_opt(record.departure_delay);
            day.arrival.push_opt(record.arrival_delay);
        }
    }

    days.into_iter()
        .map(|(date, day)| DailyTrendPoint {
            date,
            flight_count: day.flights,
            cancelled_count: day.cancelled,
            avg_departure_delay: day.departure.value(),
            avg_arrival_delay: day.arrival.value(),
            cancellation_rate: ratio(day.cancelled, day.flights),
        })
        .collect()
}

/// Mean departure delay of operated flights by scheduled departure hour.
/// Always 24 buckets; hours without flights report `avg_delay = None`.
pub fn hourly_cascade(records: &[&FlightRecord]) -> Vec<HourlyBucket> {
    let records = screen(records, "hourly_cascade");
    let mut flights = [0usize; 24];
    let mut delays = [Mean::default(); 24];

    for record in records.into_iter().filter(|r| r.is_active()) {
        if let Some(hour) = record.departure_hour() {
            let hour = hour as usize;
            flights[hour] += 1;
            delays[hour].push_opt(record.departure_delay);
        }
    }

    (0..24)
        .map(|hour| HourlyBucket {
            hour: hour as u8,
            flight_count: flights[hour],
            avg_delay: delays[hour].value(),
        })
        .collect()
}

/// Operated flights grouped by weekday (Monday = 0). Always 7 buckets.
pub fn day_of_week_distribution(records: &[&FlightRecord]) -> Vec<WeekdayBucket> {
    let records = screen(records, "day_of_week_distribution");
    let mut flights = [0usize; 7];
    let mut departure = [Mean::default(); 7];
    let mut arrival = [Mean::default(); 7];

    for record in records.into_iter().filter(|r| r.is_active()) {
        let day = record.weekday() as usize;
        flights[day] += 1;
        departure[day].push_opt(record.departure_delay);
        arrival[day].push_opt(record.arrival_delay);
    }

    (0..7)
        .map(|day| WeekdayBucket {
            weekday: day as u8,
            label: weekday_label(day as u8).to_string(),
            flight_count: flights[day],
            avg_delay: departure[day].value(),
            avg_arrival_delay: arrival[day].value(),
        })
        .collect()
}

#[cfg(test)]
#[path = "trends_tests.rs"]
mod trends_tests;
