//! Data Transfer Objects for HTTP API.
//!
//! Query parameter types and response envelopes. Result payloads themselves
//! are the types from [`crate::api`].

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::{AirportRole, TimelineLayout};
use crate::models::{AirlineInfo, FilterSpec, RecordId};
use crate::services::{CacheStats, DerivedResult};
use crate::store::RecordStore;

/// Query parameters shared by the analytics endpoints.
///
/// `from`/`to` form an inclusive date range; a missing bound is taken from
/// the first or last date in the store. A bound outside the data yields a
/// range that selects nothing rather than an inverted one.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilterQuery {
    /// Carrier code (optional)
    #[serde(default)]
    pub airline: Option<String>,
    /// Single calendar day (optional)
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Origin airport code (optional)
    #[serde(default)]
    pub airport: Option<String>,
    /// First day of the range (optional)
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last day of the range (optional)
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl FilterQuery {
    pub fn into_filter(self, store: &RecordStore) -> FilterSpec {
        let mut filter = FilterSpec::all();
        if let Some(airline) = self.airline.filter(|s| !s.is_empty()) {
            filter = filter.with_airline(airline.to_uppercase());
        }
        if let Some(date) = self.date {
            filter = filter.on_date(date);
        }
        if let Some(airport) = self.airport.filter(|s| !s.is_empty()) {
            filter = filter.at_airport(airport.to_uppercase());
        }
        match (self.from, self.to) {
            (None, None) => {}
            (Some(start), Some(end)) => filter = filter.between(start, end),
            (Some(start), None) => {
                let end = store.date_span().map_or(start, |(_, last)| last.max(start));
                filter = filter.between(start, end);
            }
            (None, Some(end)) => {
                let start = store.date_span().map_or(end, |(first, _)| first.min(end));
                filter = filter.between(start, end);
            }
        }
        filter
    }
}

/// Query parameters for the airport picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportsQuery {
    #[serde(default)]
    pub airline: Option<String>,
    pub date: NaiveDate,
}

/// Query parameters for the timeline endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineQuery {
    /// Origin airport code
    pub airport: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Carrier code (optional)
    #[serde(default)]
    pub airline: Option<String>,
}

impl TimelineQuery {
    pub fn into_filter(self) -> FilterSpec {
        let mut filter = FilterSpec::all()
            .at_airport(self.airport.to_uppercase())
            .on_date(self.date);
        if let Some(airline) = self.airline.filter(|s| !s.is_empty()) {
            filter = filter.with_airline(airline.to_uppercase());
        }
        filter
    }
}

/// Extra query parameters for the worst-airports ranking.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorstAirportsQuery {
    /// Ranked side of the flight (default: departure)
    #[serde(default)]
    pub role: Option<AirportRole>,
    /// Ranking length (default: configured `default_top_n`)
    #[serde(default)]
    pub top: Option<usize>,
}

/// Envelope for every derived analytics response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedResponse {
    pub filter: FilterSpec,
    /// Stable hash of the filter, usable as a client-side cache key
    pub fingerprint: String,
    #[serde(flatten)]
    pub result: DerivedResult,
}

impl DerivedResponse {
    pub fn new(filter: FilterSpec, result: DerivedResult) -> Self {
        Self {
            fingerprint: filter.fingerprint(),
            filter,
            result,
        }
    }
}

/// One placed flight joined with its record and carrier display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineRow {
    pub record_id: RecordId,
    pub lane: usize,
    pub airline: String,
    pub airline_name: String,
    pub color: String,
    pub flight_number: u32,
    pub tail_number: Option<String>,
    pub destination: String,
    pub scheduled_departure: Option<NaiveTime>,
    pub departure_delay: Option<i32>,
    pub visual_start: u32,
    pub visual_end: u32,
    pub scheduled_block_end: Option<u32>,
    pub continues_next_day: bool,
    pub overflow: bool,
}

/// Timeline response for one airport-day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub filter: FilterSpec,
    pub fingerprint: String,
    pub lane_count: usize,
    pub overflow_count: usize,
    pub rows: Vec<TimelineRow>,
}

impl TimelineResponse {
    /// Join the layout slots with the records they reference. Slots whose
    /// record id is not in the store are dropped.
    pub fn build(filter: FilterSpec, layout: &TimelineLayout, store: &RecordStore) -> Self {
        let rows = layout
            .slots
            .iter()
            .filter_map(|slot| {
                let record = store.get(slot.record_id)?;
                let AirlineInfo { name, color, .. } = store.airlines().resolve(&record.airline);
                Some(TimelineRow {
                    record_id: slot.record_id,
                    lane: slot.lane,
                    airline: record.airline.clone(),
                    airline_name: name,
                    color,
                    flight_number: record.flight_number,
                    tail_number: record.tail_number.clone(),
                    destination: record.destination.clone(),
                    scheduled_departure: record.scheduled_departure,
                    departure_delay: record.departure_delay,
                    visual_start: slot.visual_start,
                    visual_end: slot.visual_end,
                    scheduled_block_end: slot.scheduled_block_end,
                    continues_next_day: slot.continues_next_day,
                    overflow: slot.overflow,
                })
            })
            .collect();

        Self {
            fingerprint: filter.fingerprint(),
            filter,
            lane_count: layout.lane_count,
            overflow_count: layout.overflow_count,
            rows,
        }
    }
}

/// Carrier list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirlineListResponse {
    pub airlines: Vec<AirlineInfo>,
    pub total: usize,
}

/// Airport picker response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportListResponse {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    pub airports: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Number of records loaded
    pub records: usize,
    /// First and last date in the dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_span: Option<(NaiveDate, NaiveDate)>,
    pub cache: CacheStats,
}
