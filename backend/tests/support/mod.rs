//! Shared builders for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use airops::models::{AirlineLookup, DelayCauses, FlightRecord, RecordId};
use airops::services::{AnalyticsService, EngineSettings};
use airops::store::RecordStore;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Fluent builder for a single flight. Defaults to an operated ORD→LAX
/// flight on 2015-07-04 with no schedule.
pub struct Flight {
    record: FlightRecord,
}

impl Flight {
    pub fn new(airline: &str, flight_number: u32) -> Self {
        Self {
            record: FlightRecord {
                id: RecordId::new(0),
                date: date(2015, 7, 4),
                airline: airline.to_string(),
                flight_number,
                tail_number: None,
                origin: "ORD".to_string(),
                destination: "LAX".to_string(),
                scheduled_departure: None,
                scheduled_arrival: None,
                actual_departure: None,
                actual_arrival: None,
                departure_delay: None,
                arrival_delay: None,
                air_time: None,
                distance: None,
                taxi_out: None,
                taxi_in: None,
                diverted: false,
                cancelled: false,
                cancellation_reason: None,
                delay_causes: DelayCauses::default(),
            },
        }
    }

    pub fn on(mut self, day: NaiveDate) -> Self {
        self.record.date = day;
        self
    }

    pub fn route(mut self, origin: &str, destination: &str) -> Self {
        self.record.origin = origin.to_string();
        self.record.destination = destination.to_string();
        self
    }

    pub fn departs(mut self, h: u32, m: u32) -> Self {
        self.record.scheduled_departure = NaiveTime::from_hms_opt(h, m, 0);
        self
    }

    pub fn departs_at_minute(mut self, minute: u32) -> Self {
        self.record.scheduled_departure = NaiveTime::from_hms_opt(minute / 60, minute % 60, 0);
        self
    }

    pub fn air_time(mut self, minutes: u32) -> Self {
        self.record.air_time = Some(minutes);
        self
    }

    pub fn delay(mut self, minutes: i32) -> Self {
        self.record.departure_delay = Some(minutes);
        self
    }

    pub fn arrival_delay(mut self, minutes: i32) -> Self {
        self.record.arrival_delay = Some(minutes);
        self
    }

    pub fn causes(mut self, causes: DelayCauses) -> Self {
        self.record.delay_causes = causes;
        self
    }

    pub fn cancelled(mut self) -> Self {
        self.record.cancelled = true;
        self
    }

    pub fn build(self) -> FlightRecord {
        self.record
    }
}

/// A small mixed dataset over two days and three carriers.
///
/// 2015-07-04 at ORD: UA1 08:00 (120 min), AA2 08:05 (60), DL3 08:10 (90),
/// DL4 cancelled. 2015-07-05 at ATL: two DL departures.
pub fn sample_records() -> Vec<FlightRecord> {
    let day1 = date(2015, 7, 4);
    let day2 = date(2015, 7, 5);
    vec![
        Flight::new("UA", 1)
            .on(day1)
            .route("ORD", "LAX")
            .departs(8, 0)
            .air_time(120)
            .delay(10)
            .arrival_delay(5)
            .causes(DelayCauses {
                weather: Some(5),
                ..Default::default()
            })
            .build(),
        Flight::new("AA", 2)
            .on(day1)
            .route("ORD", "DFW")
            .departs(8, 5)
            .air_time(60)
            .delay(0)
            .arrival_delay(-3)
            .build(),
        Flight::new("DL", 3)
            .on(day1)
            .route("ORD", "ATL")
            .departs(8, 10)
            .air_time(90)
            .delay(40)
            .arrival_delay(35)
            .causes(DelayCauses {
                airline: Some(20),
                late_aircraft: Some(15),
                ..Default::default()
            })
            .build(),
        Flight::new("DL", 4)
            .on(day1)
            .route("ORD", "ATL")
            .departs(9, 0)
            .cancelled()
            .build(),
        Flight::new("DL", 5)
            .on(day2)
            .route("ATL", "ORD")
            .departs(6, 30)
            .air_time(100)
            .delay(-2)
            .arrival_delay(0)
            .build(),
        Flight::new("DL", 6)
            .on(day2)
            .route("ATL", "LAX")
            .departs(7, 0)
            .air_time(240)
            .delay(25)
            .arrival_delay(30)
            .causes(DelayCauses {
                air_system: Some(30),
                ..Default::default()
            })
            .build(),
    ]
}

pub fn sample_store() -> RecordStore {
    RecordStore::new(sample_records(), AirlineLookup::builtin())
}

pub fn sample_service(cache_capacity: usize) -> Arc<AnalyticsService> {
    Arc::new(AnalyticsService::new(
        Arc::new(sample_store()),
        EngineSettings {
            min_airport_flights: 1,
            ..Default::default()
        },
        cache_capacity,
    ))
}
