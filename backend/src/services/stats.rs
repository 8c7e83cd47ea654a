//! Small numeric helpers shared by the aggregation modules.

use log::{debug, warn};

use crate::models::FlightRecord;

/// Running mean over integer minutes. Summation is exact, so the result does
/// not depend on the order values arrive in.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Mean {
    sum: i64,
    count: usize,
}

impl Mean {
    pub(crate) fn push(&mut self, value: i64) {
        self.sum += value;
        self.count += 1;
    }

    pub(crate) fn push_opt(&mut self, value: Option<i32>) {
        if let Some(v) = value {
            self.push(v as i64);
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn value(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.sum as f64 / self.count as f64)
        } else {
            None
        }
    }
}

/// `part / total`, or 0.0 for an empty total.
pub(crate) fn ratio(part: usize, total: usize) -> f64 {
    if total > 0 {
        part as f64 / total as f64
    } else {
        0.0
    }
}

/// Drop records that violate the cancellation invariants.
pub(crate) fn screen<'a>(records: &[&'a FlightRecord], operation: &str) -> Vec<&'a FlightRecord> {
    let mut excluded = 0usize;
    let kept: Vec<&FlightRecord> = records
        .iter()
        .copied()
        .filter(|record| match record.integrity_issue() {
            Some(issue) => {
                debug!("{}: {}", operation, issue);
                excluded += 1;
                false
            }
            None => true,
        })
        .collect();

    if excluded > 0 {
        warn!(
            "{}: excluded {} of {} records with integrity issues",
            operation,
            excluded,
            records.len()
        );
    }
    kept
}
