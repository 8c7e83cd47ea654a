use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::time::{minute_of_day, weekday_index};
use crate::error::IntegrityWarning;

/// Departure delay (minutes) at or below which a flight counts as on time.
pub const ON_TIME_THRESHOLD_MINUTES: i32 = 15;

/// Position of a record inside the [`RecordStore`](crate::store::RecordStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl RecordId {
    pub fn new(value: usize) -> Self {
        Self(value)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reason code attached to a cancelled flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationReason {
    /// `A`
    Airline,
    /// `B`
    Weather,
    /// `C`
    NationalAirSystem,
    /// `D`
    Security,
}

impl CancellationReason {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "A" => Some(Self::Airline),
            "B" => Some(Self::Weather),
            "C" => Some(Self::NationalAirSystem),
            "D" => Some(Self::Security),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Airline => "A",
            Self::Weather => "B",
            Self::NationalAirSystem => "C",
            Self::Security => "D",
        }
    }
}

/// Delay categories reported by carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayCause {
    Weather,
    Airline,
    AirSystem,
    Security,
    LateAircraft,
}

impl DelayCause {
    pub const ALL: [DelayCause; 5] = [
        DelayCause::Weather,
        DelayCause::Airline,
        DelayCause::AirSystem,
        DelayCause::Security,
        DelayCause::LateAircraft,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weather => "Weather",
            Self::Airline => "Airline",
            Self::AirSystem => "Air System",
            Self::Security => "Security",
            Self::LateAircraft => "Late Aircraft",
        }
    }
}

/// Minutes of delay attributed to each cause. Each field is independently
/// optional; the sum is not guaranteed to match the arrival delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayCauses {
    pub weather: Option<u32>,
    pub airline: Option<u32>,
    pub air_system: Option<u32>,
    pub security: Option<u32>,
    pub late_aircraft: Option<u32>,
}

impl DelayCauses {
    pub fn get(&self, cause: DelayCause) -> Option<u32> {
        match cause {
            DelayCause::Weather => self.weather,
            DelayCause::Airline => self.airline,
            DelayCause::AirSystem => self.air_system,
            DelayCause::Security => self.security,
            DelayCause::LateAircraft => self.late_aircraft,
        }
    }

    /// True when at least one cause carries a value.
    pub fn any_reported(&self) -> bool {
        DelayCause::ALL.iter().any(|c| self.get(*c).is_some())
    }
}

/// One row of the flight table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub airline: String,
    pub flight_number: u32,
    pub tail_number: Option<String>,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: Option<NaiveTime>,
    pub scheduled_arrival: Option<NaiveTime>,
    pub actual_departure: Option<NaiveTime>,
    pub actual_arrival: Option<NaiveTime>,
    /// Signed minutes; negative means an early departure.
    pub departure_delay: Option<i32>,
    pub arrival_delay: Option<i32>,
    pub air_time: Option<u32>,
    pub distance: Option<u32>,
    pub taxi_out: Option<u32>,
    pub taxi_in: Option<u32>,
    pub diverted: bool,
    pub cancelled: bool,
    pub cancellation_reason: Option<CancellationReason>,
    pub delay_causes: DelayCauses,
}

impl FlightRecord {
    /// True when the flight operated.
    pub fn is_active(&self) -> bool {
        !self.cancelled
    }

    /// Operated with a known departure delay within the on-time threshold.
    pub fn is_on_time(&self) -> bool {
        self.is_active()
            && self
                .departure_delay
                .is_some_and(|d| d <= ON_TIME_THRESHOLD_MINUTES)
    }

    pub fn departure_minute(&self) -> Option<u32> {
        self.scheduled_departure.map(minute_of_day)
    }

    pub fn departure_hour(&self) -> Option<u32> {
        self.departure_minute().map(|m| m / 60)
    }

    pub fn weekday(&self) -> u8 {
        weekday_index(self.date)
    }

    /// Check the record against the cancellation invariants.
    pub fn integrity_issue(&self) -> Option<IntegrityWarning> {
        if self.cancelled {
            if self.actual_departure.is_some() || self.actual_arrival.is_some() {
                return Some(IntegrityWarning::CancelledWithActualTimes { id: self.id });
            }
        } else if self.scheduled_departure.is_none() {
            return Some(IntegrityWarning::MissingScheduledDeparture { id: self.id });
        }
        None
    }
}
