//! Headline KPIs, delay severity and operational insights.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::causes::cause_breakdown;
use super::stats::{ratio, screen, Mean};
use super::trends::hourly_cascade;
use crate::api::{
    CarrierDelay, DelaySeverity, HourlyBucket, OperationalInsights, SeverityBucket,
    SeverityClass, SummaryMetrics,
};
use crate::models::FlightRecord;

/// Compute the KPI strip shown above every analytics view.
pub fn summary(records: &[&FlightRecord]) -> SummaryMetrics {
    let records = screen(records, "summary");
    let total_flights = records.len();
    let cancelled_flights = records.iter().filter(|r| r.cancelled).count();
    let on_time = records.iter().filter(|r| r.is_on_time()).count();

    let mut departure = Mean::default();
    let mut arrival = Mean::default();
    let mut max_departure_delay: Option<i32> = None;
    for record in records.iter().filter(|r| r.is_active()) {
        departure.push_opt(record.departure_delay);
        arrival.push_opt(record.arrival_delay);
        if let Some(delay) = record.departure_delay {
            max_departure_delay = Some(max_departure_delay.map_or(delay, |m| m.max(delay)));
        }
    }

    SummaryMetrics {
        total_flights,
        cancelled_flights,
        cancellation_rate: ratio(cancelled_flights, total_flights),
        on_time_rate: ratio(on_time, total_flights),
        avg_departure_delay: departure.value(),
        avg_arrival_delay: arrival.value(),
        max_departure_delay,
    }
}

/// Bucket late arrivals of operated flights into severity classes.
pub fn delay_severity(records: &[&FlightRecord]) -> DelaySeverity {
    let records = screen(records, "delay_severity");
    let mut counts: BTreeMap<SeverityClass, usize> = BTreeMap::new();
    let mut delays = Mean::default();

    for record in records.into_iter().filter(|r| r.is_active()) {
        let Some(delay) = record.arrival_delay else {
            continue;
        };
        if let Some(class) = SeverityClass::classify(delay) {
            *counts.entry(class).or_default() += 1;
            delays.push(delay as i64);
        }
    }

    let delayed_flights = delays.count();
    let severe = counts.get(&SeverityClass::Severe).copied().unwrap_or(0);

    let buckets = SeverityClass::ALL
        .iter()
        .map(|class| {
            let flight_count = counts.get(class).copied().unwrap_or(0);
            SeverityBucket {
                class: *class,
                label: class.label().to_string(),
                flight_count,
                share: ratio(flight_count, delayed_flights),
            }
        })
        .collect();

    DelaySeverity {
        delayed_flights,
        mean_delay: delays.value(),
        severe_share: ratio(severe, delayed_flights),
        buckets,
    }
}

fn carrier_arrival_delays(records: &[&FlightRecord]) -> Vec<CarrierDelay> {
    let mut carriers: BTreeMap<&str, Mean> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_active()) {
        if let Some(delay) = record.arrival_delay {
            carriers
                .entry(record.airline.as_str())
                .or_default()
                .push(delay as i64);
        }
    }
    carriers
        .into_iter()
        .filter_map(|(airline, mean)| {
            mean.value().map(|avg| CarrierDelay {
                airline: airline.to_string(),
                avg_arrival_delay: avg,
                flight_count: mean.count(),
            })
        })
        .collect()
}

fn weather_share(records: &[&FlightRecord]) -> Option<f64> {
    let mut weather = 0u64;
    let mut total = 0u64;
    for record in records.iter().filter(|r| r.is_active()) {
        match record.arrival_delay {
            Some(delay) if delay > 0 => {
                total += delay as u64;
                weather += record.delay_causes.weather.unwrap_or(0) as u64;
            }
            _ => {}
        }
    }
    (total > 0).then(|| weather as f64 / total as f64)
}

/// Derive the plain-language findings: worst departure hour, best and
/// worst carrier by arrival delay, weather share and the leading cause.
pub fn insights(records: &[&FlightRecord]) -> OperationalInsights {
    let screened = screen(records, "insights");

    let worst_hour = hourly_cascade(&screened)
        .into_iter()
        .filter(|bucket| bucket.avg_delay.is_some())
        .fold(None, |worst: Option<HourlyBucket>, bucket| match worst {
            Some(w) if w.avg_delay >= bucket.avg_delay => Some(w),
            _ => Some(bucket),
        });

    let carriers = carrier_arrival_delays(&screened);
    let by_delay = |a: &&CarrierDelay, b: &&CarrierDelay| {
        a.avg_arrival_delay
            .partial_cmp(&b.avg_arrival_delay)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.airline.cmp(&a.airline))
    };
    let best_carrier = carriers.iter().min_by(by_delay).cloned();
    let worst_carrier = carriers.iter().max_by(by_delay).cloned();

    OperationalInsights {
        worst_hour,
        best_carrier,
        worst_carrier,
        weather_share: weather_share(&screened),
        top_cause: cause_breakdown(&screened).top_cause(),
    }
}

#[cfg(test)]
#[path = "insights_tests.rs"]
mod insights_tests;
