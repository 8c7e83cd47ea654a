//! Partition indexes built once over the canonically ordered records.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Range;

use crate::models::{FilterSpec, FlightRecord, RecordId};

/// Records a query has to scan, before the remaining predicates run.
#[derive(Debug, Clone)]
pub(crate) enum Candidates<'a> {
    /// A contiguous run of the canonical record vector.
    Span(Range<usize>),
    /// Ids in canonical order.
    Ids(&'a [RecordId]),
}

impl Candidates<'_> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Candidates::Span(range) => range.len(),
            Candidates::Ids(ids) => ids.len(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct PartitionIndex {
    by_date: BTreeMap<NaiveDate, Range<usize>>,
    by_origin_date: HashMap<(String, NaiveDate), Vec<RecordId>>,
    by_origin: HashMap<String, Vec<RecordId>>,
    by_airline: HashMap<String, Vec<RecordId>>,
    airports: BTreeSet<String>,
    total: usize,
}

impl PartitionIndex {
    /// `records` must already be in canonical order with ids matching
    /// their positions.
    pub(crate) fn build(records: &[FlightRecord]) -> Self {
        let mut index = PartitionIndex {
            total: records.len(),
            ..Default::default()
        };

        for (pos, record) in records.iter().enumerate() {
            index
                .by_date
                .entry(record.date)
                .and_modify(|range| range.end = pos + 1)
                .or_insert(pos..pos + 1);
            index
                .by_origin_date
                .entry((record.origin.clone(), record.date))
                .or_default()
                .push(record.id);
            index
                .by_origin
                .entry(record.origin.clone())
                .or_default()
                .push(record.id);
            index
                .by_airline
                .entry(record.airline.clone())
                .or_default()
                .push(record.id);

            if !index.airports.contains(&record.origin) {
                index.airports.insert(record.origin.clone());
            }
            if !index.airports.contains(&record.destination) {
                index.airports.insert(record.destination.clone());
            }
        }

        index
    }

    pub(crate) fn has_airport(&self, code: &str) -> bool {
        self.airports.contains(code)
    }

    pub(crate) fn airports(&self) -> impl Iterator<Item = &str> {
        self.airports.iter().map(String::as_str)
    }

    pub(crate) fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    pub(crate) fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.by_date.keys().next()?;
        let last = self.by_date.keys().next_back()?;
        Some((*first, *last))
    }

    fn date_partition(&self, date: NaiveDate) -> Range<usize> {
        self.by_date.get(&date).cloned().unwrap_or(0..0)
    }

    fn range_partition(&self, start: NaiveDate, end: NaiveDate) -> Range<usize> {
        let mut days = self.by_date.range(start..=end);
        match (days.next(), days.next_back()) {
            (Some((_, first)), Some((_, last))) => first.start..last.end,
            (Some((_, only)), None) => only.clone(),
            _ => 0..0,
        }
    }

    fn ids<'a>(map: &'a HashMap<String, Vec<RecordId>>, key: &str) -> &'a [RecordId] {
        map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Smallest partition that covers every record `filter` can match.
    pub(crate) fn candidates(&self, filter: &FilterSpec) -> Candidates<'_> {
        let mut options: Vec<Candidates<'_>> = Vec::with_capacity(4);

        if let Some((origin, date)) = filter.airport_day() {
            let ids = self
                .by_origin_date
                .get(&(origin.to_string(), date))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            options.push(Candidates::Ids(ids));
        }
        if let Some(date) = filter.date {
            options.push(Candidates::Span(self.date_partition(date)));
        }
        if let Some(range) = filter.date_range {
            options.push(Candidates::Span(self.range_partition(range.start, range.end)));
        }
        if let Some(ref airline) = filter.airline {
            options.push(Candidates::Ids(Self::ids(&self.by_airline, airline)));
        }
        if let Some(ref origin) = filter.origin {
            options.push(Candidates::Ids(Self::ids(&self.by_origin, origin)));
        }

        options
            .into_iter()
            .min_by_key(Candidates::len)
            .unwrap_or(Candidates::Span(0..self.total))
    }
}
