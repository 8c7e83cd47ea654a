//! Public API surface for the analytics backend.
//!
//! This file consolidates the result types produced by the aggregation and
//! timeline engines. All types derive Serialize/Deserialize so the HTTP layer
//! can hand them to the renderer as-is.
//!
//! Averages over an empty group are `None` (JSON `null`), never `0.0`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::models::{
    AirlineInfo, AirlineLookup, CancellationReason, DateRange, DelayCause, DelayCauses,
    FilterSpec, FlightRecord, RecordId,
};

// =============================================================================
// Trends
// =============================================================================

/// One calendar day of the daily trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    pub flight_count: usize,
    pub cancelled_count: usize,
    pub avg_departure_delay: Option<f64>,
    pub avg_arrival_delay: Option<f64>,
    pub cancellation_rate: f64,
}

/// Departures grouped by scheduled departure hour (0..=23).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: u8,
    pub flight_count: usize,
    pub avg_delay: Option<f64>,
}

/// Day-of-week bucket, Monday = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayBucket {
    pub weekday: u8,
    pub label: String,
    pub flight_count: usize,
    pub avg_delay: Option<f64>,
    pub avg_arrival_delay: Option<f64>,
}

// =============================================================================
// Performance
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlinePerformance {
    pub airline: String,
    pub flight_count: usize,
    pub on_time_count: usize,
    pub cancelled_count: usize,
    /// On-time flights over all flights, cancelled included.
    pub on_time_ratio: f64,
    pub cancellation_rate: f64,
    pub avg_delay: Option<f64>,
    pub avg_arrival_delay: Option<f64>,
}

/// Which end of the flight an airport ranking looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirportRole {
    /// Origin airports, ranked on departure delay.
    Departure,
    /// Destination airports, ranked on arrival delay.
    Arrival,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportDelay {
    pub airport: String,
    pub avg_delay: f64,
    pub flight_count: usize,
}

// =============================================================================
// Delay causes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseTotal {
    pub cause: DelayCause,
    pub label: String,
    pub minutes: u64,
    /// Share of all attributed minutes.
    pub share: Option<f64>,
    /// Minutes per contributing record.
    pub mean_per_record: Option<f64>,
}

/// Delay minutes per cause over operated flights that report at least one
/// cause. Records with every cause missing are not part of the denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseBreakdown {
    pub contributing_records: usize,
    pub total_minutes: u64,
    pub causes: Vec<CauseTotal>,
}

impl CauseBreakdown {
    pub fn minutes(&self, cause: DelayCause) -> u64 {
        self.causes
            .iter()
            .find(|c| c.cause == cause)
            .map(|c| c.minutes)
            .unwrap_or(0)
    }

    /// Cause with the most minutes; `None` when nothing was attributed.
    pub fn top_cause(&self) -> Option<DelayCause> {
        self.causes
            .iter()
            .filter(|c| c.minutes > 0)
            .max_by(|a, b| a.minutes.cmp(&b.minutes).then_with(|| b.cause.cmp(&a.cause)))
            .map(|c| c.cause)
    }
}

// =============================================================================
// Summary and insights
// =============================================================================

/// Headline KPIs for a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_flights: usize,
    pub cancelled_flights: usize,
    pub cancellation_rate: f64,
    pub on_time_rate: f64,
    pub avg_departure_delay: Option<f64>,
    pub avg_arrival_delay: Option<f64>,
    pub max_departure_delay: Option<i32>,
}

/// Arrival-delay severity classes, upper bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityClass {
    /// (0, 15]
    Minor,
    /// (15, 30]
    Moderate,
    /// (30, 60]
    Significant,
    /// (60, 120]
    Major,
    /// over 120
    Severe,
}

impl SeverityClass {
    pub const ALL: [SeverityClass; 5] = [
        SeverityClass::Minor,
        SeverityClass::Moderate,
        SeverityClass::Significant,
        SeverityClass::Major,
        SeverityClass::Severe,
    ];

    /// Class for a positive arrival delay.
    pub fn classify(delay_minutes: i32) -> Option<Self> {
        match delay_minutes {
            i32::MIN..=0 => None,
            1..=15 => Some(Self::Minor),
            16..=30 => Some(Self::Moderate),
            31..=60 => Some(Self::Significant),
            61..=120 => Some(Self::Major),
            _ => Some(Self::Severe),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Minor => "Minor (0-15 min)",
            Self::Moderate => "Moderate (15-30 min)",
            Self::Significant => "Significant (30-60 min)",
            Self::Major => "Major (60-120 min)",
            Self::Severe => "Severe (>120 min)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityBucket {
    pub class: SeverityClass,
    pub label: String,
    pub flight_count: usize,
    pub share: f64,
}

/// Distribution of arrival delays among operated flights that arrived late.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelaySeverity {
    pub delayed_flights: usize,
    pub mean_delay: Option<f64>,
    /// Share of delayed flights more than two hours late.
    pub severe_share: f64,
    pub buckets: Vec<SeverityBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierDelay {
    pub airline: String,
    pub avg_arrival_delay: f64,
    pub flight_count: usize,
}

/// Plain-language findings surfaced next to the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalInsights {
    /// Hour with the highest mean departure delay.
    pub worst_hour: Option<HourlyBucket>,
    pub best_carrier: Option<CarrierDelay>,
    pub worst_carrier: Option<CarrierDelay>,
    /// Weather minutes over arrival-delay minutes of late flights.
    pub weather_share: Option<f64>,
    pub top_cause: Option<DelayCause>,
}

// =============================================================================
// Timeline
// =============================================================================

/// Placement of one departure on the airport-day timeline.
///
/// Times are minutes from the airport-day's midnight; `visual_end` may run
/// past 1440 for late-evening departures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSlot {
    pub record_id: RecordId,
    pub lane: usize,
    pub visual_start: u32,
    pub visual_end: u32,
    /// Scheduled arrival, shifted by a day when it falls before departure.
    pub scheduled_block_end: Option<u32>,
    pub continues_next_day: bool,
    /// Placed on a busy lane because the lane capacity was reached.
    pub overflow: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub lane_count: usize,
    pub overflow_count: usize,
    pub slots: Vec<TimelineSlot>,
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
