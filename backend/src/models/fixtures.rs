//! Record builders shared by the unit tests.

use chrono::{NaiveDate, NaiveTime};

use super::flight::{DelayCauses, FlightRecord, RecordId};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) struct FlightBuilder {
    record: FlightRecord,
}

impl FlightBuilder {
    pub(crate) fn new(airline: &str, flight_number: u32) -> Self {
        Self {
            record: FlightRecord {
                id: RecordId(0),
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

    pub(crate) fn on(mut self, y: i32, m: u32, d: u32) -> Self {
        self.record.date = date(y, m, d);
        self
    }

    pub(crate) fn route(mut self, origin: &str, destination: &str) -> Self {
        self.record.origin = origin.to_string();
        self.record.destination = destination.to_string();
        self
    }

    pub(crate) fn tail(mut self, tail: &str) -> Self {
        self.record.tail_number = Some(tail.to_string());
        self
    }

    pub(crate) fn departs(mut self, h: u32, m: u32) -> Self {
        self.record.scheduled_departure = NaiveTime::from_hms_opt(h, m, 0);
        self
    }

    pub(crate) fn arrives(mut self, h: u32, m: u32) -> Self {
        self.record.scheduled_arrival = NaiveTime::from_hms_opt(h, m, 0);
        self
    }

    pub(crate) fn air_time(mut self, minutes: u32) -> Self {
        self.record.air_time = Some(minutes);
        self
    }

    pub(crate) fn delay(mut self, minutes: i32) -> Self {
        self.record.departure_delay = Some(minutes);
        self
    }

    pub(crate) fn arrival_delay(mut self, minutes: i32) -> Self {
        self.record.arrival_delay = Some(minutes);
        self
    }

    pub(crate) fn causes(mut self, causes: DelayCauses) -> Self {
        self.record.delay_causes = causes;
        self
    }

    pub(crate) fn cancelled(mut self) -> Self {
        self.record.cancelled = true;
        self
    }

    pub(crate) fn build(self) -> FlightRecord {
        self.record
    }
}
