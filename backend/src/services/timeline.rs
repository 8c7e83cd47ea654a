//! Lane layout for the per-airport daily operations chart.
//!
//! Each operated departure becomes a horizontal bar from its scheduled
//! departure to `departure + max(air_time, min_visual_width)`. Bars are
//! stacked into lanes so that no two bars in one lane overlap, keeping at
//! least `min_gap_minutes` between a bar's end and the next bar's start.
//!
//! Flights are placed in departure order and each takes the lowest-numbered
//! lane that is free at its start. Two min-heaps make this O(n log n): busy
//! lanes keyed by the minute they free up, and free lane indices. Greedy
//! first-fit in start order uses exactly as many lanes as the largest set of
//! mutually overlapping (gap-extended) bars, which is the minimum possible.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::stats::screen;
use crate::api::{TimelineLayout, TimelineSlot};
use crate::models::{minutes_until, FlightRecord, MINUTES_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Required clearance between consecutive bars in one lane.
    pub min_gap_minutes: u32,
    /// Shortest bar drawn; also used when air time is unknown.
    pub min_visual_width_minutes: u32,
    /// Upper bound on lanes. Once reached, flights queue on the lane that
    /// frees first and are marked as overflow.
    pub lane_capacity: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_gap_minutes: 5,
            min_visual_width_minutes: 15,
            lane_capacity: None,
        }
    }
}

/// Longest bar drawn. Air times beyond this are data errors.
pub const MAX_VISUAL_WIDTH_MINUTES: u32 = 2 * MINUTES_PER_DAY;

/// Visual bar `[start, end)` in minutes from midnight, or `None` for flights
/// that are not drawn.
pub fn visual_span(record: &FlightRecord, config: &LayoutConfig) -> Option<(u32, u32)> {
    if !record.is_active() {
        return None;
    }
    let start = record.departure_minute()?;
    let width = record
        .air_time
        .unwrap_or(0)
        .max(config.min_visual_width_minutes)
        .min(MAX_VISUAL_WIDTH_MINUTES);
    Some((start, start.saturating_add(width)))
}

struct Placement<'a> {
    record: &'a FlightRecord,
    start: u32,
    width: u32,
}

/// Assign lanes to the departures of one airport-day.
///
/// `records` is expected in canonical store order; flights sharing a
/// departure minute keep that order. Cancelled flights and records with
/// integrity problems are skipped.
pub fn layout(records: &[&FlightRecord], config: &LayoutConfig) -> TimelineLayout {
    let records = screen(records, "timeline_layout");
    let mut placements: Vec<Placement<'_>> = records
        .into_iter()
        .filter_map(|record| {
            visual_span(record, config).map(|(start, end)| Placement {
                record,
                start,
                width: end - start,
            })
        })
        .collect();
    placements.sort_by_key(|p| p.start);

    let gap = config.min_gap_minutes;
    let capacity = config.lane_capacity.map(|c| c.max(1));

    let mut busy: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
    let mut free: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    let mut lane_count = 0usize;
    let mut overflow_count = 0usize;
    let mut slots = Vec::with_capacity(placements.len());

    for placement in placements {
        while let Some(&Reverse((available_at, lane))) = busy.peek() {
            if available_at > placement.start {
                break;
            }
            busy.pop();
            free.push(Reverse(lane));
        }

        let at_capacity = capacity.is_some_and(|cap| lane_count >= cap);
        let (lane, start, overflow) = match free.pop() {
            Some(Reverse(lane)) => (lane, placement.start, false),
            None if !at_capacity => {
                lane_count += 1;
                (lane_count - 1, placement.start, false)
            }
            None => match busy.pop() {
                Some(Reverse((available_at, lane))) => (lane, available_at, true),
                None => {
                    lane_count += 1;
                    (lane_count - 1, placement.start, false)
                }
            },
        };

        let end = start.saturating_add(placement.width);
        busy.push(Reverse((end.saturating_add(gap), lane)));
        if overflow {
            overflow_count += 1;
        }

        let scheduled_block_end = match (
            placement.record.scheduled_departure,
            placement.record.scheduled_arrival,
        ) {
            (Some(dep), Some(arr)) => Some(placement.start + minutes_until(dep, arr)),
            _ => None,
        };
        let continues_next_day = end > MINUTES_PER_DAY
            || scheduled_block_end.is_some_and(|block_end| block_end > MINUTES_PER_DAY);

        slots.push(TimelineSlot {
            record_id: placement.record.id,
            lane,
            visual_start: start,
            visual_end: end,
            scheduled_block_end,
            continues_next_day,
            overflow,
        });
    }

    debug!(
        "timeline layout: {} slots in {} lanes ({} overflow)",
        slots.len(),
        lane_count,
        overflow_count
    );

    TimelineLayout {
        lane_count,
        overflow_count,
        slots,
    }
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod timeline_tests;
