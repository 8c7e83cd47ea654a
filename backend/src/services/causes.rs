//! Delay-cause decomposition.

use super::stats::screen;
use crate::api::{CauseBreakdown, CauseTotal};
use crate::models::{DelayCause, FlightRecord};

/// Sum delay minutes per cause over operated flights that report at least
/// one cause. Missing causes count as zero minutes within a contributing
/// record; records reporting no cause at all are excluded entirely.
pub fn cause_breakdown(records: &[&FlightRecord]) -> CauseBreakdown {
    let records = screen(records, "cause_breakdown");
    let mut minutes = [0u64; DelayCause::ALL.len()];
    let mut contributing = 0usize;

    for record in records
        .into_iter()
        .filter(|r| r.is_active() && r.delay_causes.any_reported())
    {
        contributing += 1;
        for (slot, cause) in minutes.iter_mut().zip(DelayCause::ALL) {
            *slot += record.delay_causes.get(cause).unwrap_or(0) as u64;
        }
    }

    let total_minutes: u64 = minutes.iter().sum();
    let causes = DelayCause::ALL
        .iter()
        .zip(minutes)
        .map(|(cause, minutes)| CauseTotal {
            cause: *cause,
            label: cause.label().to_string(),
            minutes,
            share: (total_minutes > 0).then(|| minutes as f64 / total_minutes as f64),
            mean_per_record: (contributing > 0).then(|| minutes as f64 / contributing as f64),
        })
        .collect();

    CauseBreakdown {
        contributing_records: contributing,
        total_minutes,
        causes,
    }
}
