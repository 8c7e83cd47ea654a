//! Carrier and airport rankings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::stats::{ratio, screen, Mean};
use crate::api::{AirlinePerformance, AirportDelay, AirportRole};
use crate::models::FlightRecord;

#[derive(Default)]
struct CarrierAccumulator {
    flights: usize,
    on_time: usize,
    cancelled: usize,
    departure: Mean,
    arrival: Mean,
}

/// Per-carrier on-time ratio, cancellation rate and mean delays, best
/// on-time ratio first (ties by carrier code).
///
/// Both ratios use every flight as the denominator, so a carrier's
/// `on_time_ratio + cancellation_rate` never exceeds 1.
pub fn airline_performance(records: &[&FlightRecord]) -> Vec<AirlinePerformance> {
    let records = screen(records, "airline_performance");
    let mut carriers: BTreeMap<&str, CarrierAccumulator> = BTreeMap::new();

    for record in records {
        let carrier = carriers.entry(record.airline.as_str()).or_default();
        carrier.flights += 1;
        if record.cancelled {
            carrier.cancelled += 1;
            continue;
        }
        if record.is_on_time() {
            carrier.on_time += 1;
        }
        carrier.departure.push_opt(record.departure_delay);
        carrier.arrival.push_opt(record.arrival_delay);
    }

    let mut ranking: Vec<AirlinePerformance> = carriers
        .into_iter()
        .map(|(airline, c)| AirlinePerformance {
            airline: airline.to_string(),
            flight_count: c.flights,
            on_time_count: c.on_time,
            cancelled_count: c.cancelled,
            on_time_ratio: ratio(c.on_time, c.flights),
            cancellation_rate: ratio(c.cancelled, c.flights),
            avg_delay: c.departure.value(),
            avg_arrival_delay: c.arrival.value(),
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.on_time_ratio
            .partial_cmp(&a.on_time_ratio)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.airline.cmp(&b.airline))
    });
    ranking
}

/// Airports with the highest mean delay for `role`, worst first.
///
/// Only operated flights with a known delay count towards an airport, and
/// airports with fewer than `min_flights` such flights are left out so a
/// single bad departure cannot top the list.
pub fn worst_airports(
    records: &[&FlightRecord],
    role: AirportRole,
    top_n: usize,
    min_flights: usize,
) -> Vec<AirportDelay> {
    let records = screen(records, "worst_airports");
    let mut airports: BTreeMap<&str, Mean> = BTreeMap::new();

    for record in records.into_iter().filter(|r| r.is_active()) {
        let (airport, delay) = match role {
            AirportRole::Departure => (record.origin.as_str(), record.departure_delay),
            AirportRole::Arrival => (record.destination.as_str(), record.arrival_delay),
        };
        if let Some(delay) = delay {
            airports.entry(airport).or_default().push(delay as i64);
        }
    }

    let mut ranking: Vec<AirportDelay> = airports
        .into_iter()
        .filter(|(_, mean)| mean.count() >= min_flights.max(1))
        .filter_map(|(airport, mean)| {
            mean.value().map(|avg_delay| AirportDelay {
                airport: airport.to_string(),
                avg_delay,
                flight_count: mean.count(),
            })
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.avg_delay
            .partial_cmp(&a.avg_delay)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.airport.cmp(&b.airport))
    });
    ranking.truncate(top_n);
    ranking
}
