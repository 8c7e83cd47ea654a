//! Selection criteria over the flight table.
//!
//! A [`FilterSpec`] is an immutable value: every field narrows the selection
//! and an empty field means "no constraint". It is hashable so it can key the
//! derived-metrics cache directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::flight::FlightRecord;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl FilterSpec {
    /// Filter that selects every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_airline(mut self, airline: impl Into<String>) -> Self {
        self.airline = Some(airline.into());
        self
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn at_airport(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.airline.is_none()
            && self.date.is_none()
            && self.origin.is_none()
            && self.date_range.is_none()
    }

    /// The single airport-day this filter names, if it names one.
    pub fn airport_day(&self) -> Option<(&str, NaiveDate)> {
        match (&self.origin, self.date) {
            (Some(origin), Some(date)) => Some((origin.as_str(), date)),
            _ => None,
        }
    }

    /// True when `record` satisfies every populated field.
    pub fn matches(&self, record: &FlightRecord) -> bool {
        if let Some(ref airline) = self.airline {
            if record.airline != *airline {
                return false;
            }
        }
        if let Some(date) = self.date {
            if record.date != date {
                return false;
            }
        }
        if let Some(ref origin) = self.origin {
            if record.origin != *origin {
                return false;
            }
        }
        if let Some(range) = self.date_range {
            if !range.contains(record.date) {
                return false;
            }
        }
        true
    }

    /// Stable SHA-256 hex digest of the canonical form.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref airline) = self.airline {
            parts.push(format!("airline={}", airline));
        }
        if let Some(date) = self.date {
            parts.push(format!("date={}", date));
        }
        if let Some(ref origin) = self.origin {
            parts.push(format!("origin={}", origin));
        }
        if let Some(range) = self.date_range {
            parts.push(format!("range={}..={}", range.start, range.end));
        }
        if parts.is_empty() {
            write!(f, "[all]")
        } else {
            write!(f, "[{}]", parts.join(", "))
        }
    }
}
