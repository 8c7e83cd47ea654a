//! In-memory flight table.
//!
//! The [`RecordStore`] owns every [`FlightRecord`] and the carrier lookup for
//! the lifetime of the process. It is built once and never mutated, so it is
//! shared across request handlers behind an `Arc` without locking.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  loader (CSV via polars)                                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │ Vec<FlightRecord>
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  RecordStore::new                                         │
//! │  - canonical sort (date, departure, flight, tail)         │
//! │  - ids stamped to positions                               │
//! │  - date spans + origin/airline id partitions              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │ select(&FilterSpec)
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  aggregations / timeline layout / cache                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Because the records are sorted once at load and every partition keeps ids
//! in that order, a selection is already in canonical order; no query sorts.

mod index;

use chrono::NaiveDate;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::{AnalyticsError, AnalyticsResult, ErrorContext};
use crate::models::{AirlineInfo, AirlineLookup, FilterSpec, FlightRecord, RecordId};
use index::{Candidates, PartitionIndex};

/// Canonical record order: date, scheduled departure (missing last), flight
/// number, tail number, then carrier and route so the order is total.
pub fn canonical_order(a: &FlightRecord, b: &FlightRecord) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| {
            (a.scheduled_departure.is_none(), a.scheduled_departure)
                .cmp(&(b.scheduled_departure.is_none(), b.scheduled_departure))
        })
        .then_with(|| a.flight_number.cmp(&b.flight_number))
        .then_with(|| a.tail_number.cmp(&b.tail_number))
        .then_with(|| a.airline.cmp(&b.airline))
        .then_with(|| a.origin.cmp(&b.origin))
        .then_with(|| a.destination.cmp(&b.destination))
}

#[derive(Debug)]
pub struct RecordStore {
    records: Vec<FlightRecord>,
    airlines: AirlineLookup,
    index: PartitionIndex,
}

impl RecordStore {
    /// Build the store. Carriers present in the records but missing from
    /// `airlines` are registered with the grey "Unknown" placeholder.
    pub fn new(mut records: Vec<FlightRecord>, mut airlines: AirlineLookup) -> Self {
        records.sort_by(canonical_order);
        for (pos, record) in records.iter_mut().enumerate() {
            record.id = RecordId(pos);
        }

        let unseen: BTreeSet<&str> = records
            .iter()
            .map(|r| r.airline.as_str())
            .filter(|code| !airlines.contains(code))
            .collect();
        let unseen: Vec<String> = unseen.into_iter().map(str::to_string).collect();
        for code in unseen {
            warn!("Airline '{}' not in lookup table; displaying as Unknown", code);
            airlines.insert(AirlineInfo::unknown(code));
        }

        let index = PartitionIndex::build(&records);
        let span = index.date_span();
        info!(
            "Record store ready: {} records, {} airlines, {} airports, dates {:?}",
            records.len(),
            airlines.len(),
            index.airports().count(),
            span
        );

        Self {
            records,
            airlines,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&FlightRecord> {
        self.records.get(id.value())
    }

    /// All records in canonical order.
    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn airlines(&self) -> &AirlineLookup {
        &self.airlines
    }

    /// Every airport code seen as an origin or destination, sorted.
    pub fn airports(&self) -> Vec<&str> {
        self.index.airports().collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.index.dates().collect()
    }

    /// First and last date present in the table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.index.date_span()
    }

    /// Reject filters that name unknown carriers or airports, or an inverted
    /// range. Dates outside the table are valid and simply select nothing.
    pub fn validate(&self, filter: &FilterSpec) -> AnalyticsResult<()> {
        if let Some(ref airline) = filter.airline {
            if !self.airlines.contains(airline) {
                return Err(AnalyticsError::invalid_filter_with_context(
                    format!("unknown airline '{}'", airline),
                    ErrorContext::new("select")
                        .with_entity("airline")
                        .with_entity_id(airline),
                ));
            }
        }
        if let Some(ref origin) = filter.origin {
            if !self.index.has_airport(origin) {
                return Err(AnalyticsError::invalid_filter_with_context(
                    format!("unknown airport '{}'", origin),
                    ErrorContext::new("select")
                        .with_entity("airport")
                        .with_entity_id(origin),
                ));
            }
        }
        if let Some(range) = filter.date_range {
            if range.is_inverted() {
                return Err(AnalyticsError::invalid_filter_with_context(
                    format!("date range starts after it ends ({} > {})", range.start, range.end),
                    ErrorContext::new("select").with_entity("date_range"),
                ));
            }
        }
        Ok(())
    }

    /// Every record matching `filter`, in canonical order.
    pub fn select(&self, filter: &FilterSpec) -> AnalyticsResult<Vec<&FlightRecord>> {
        self.validate(filter)?;

        let candidates = self.index.candidates(filter);
        let scanned = candidates.len();
        let selected: Vec<&FlightRecord> = match candidates {
            Candidates::Span(range) => self.records[range]
                .iter()
                .filter(|r| filter.matches(r))
                .collect(),
            Candidates::Ids(ids) => ids
                .iter()
                .map(|id| &self.records[id.value()])
                .filter(|r| filter.matches(r))
                .collect(),
        };

        debug!(
            "select {}: scanned {} candidates, matched {}",
            filter,
            scanned,
            selected.len()
        );
        Ok(selected)
    }

    /// Origins with at least one operated departure on `date`, optionally
    /// restricted to one carrier. Feeds the airport picker of the timeline.
    pub fn origins_for(
        &self,
        airline: Option<&str>,
        date: NaiveDate,
    ) -> AnalyticsResult<Vec<String>> {
        let mut filter = FilterSpec::all().on_date(date);
        if let Some(code) = airline {
            filter = filter.with_airline(code);
        }
        let origins: BTreeSet<&str> = self
            .select(&filter)?
            .into_iter()
            .filter(|r| r.is_active())
            .map(|r| r.origin.as_str())
            .collect();
        Ok(origins.into_iter().map(str::to_string).collect())
    }
}
