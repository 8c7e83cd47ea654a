use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use airops::models::{AirlineLookup, DelayCauses, FilterSpec, FlightRecord, RecordId};
use airops::services::{airline_performance, cause_breakdown, daily_trend, layout, LayoutConfig};
use airops::store::RecordStore;

const AIRPORTS: [&str; 6] = ["ATL", "ORD", "DFW", "DEN", "LAX", "SFO"];
const AIRLINES: [&str; 5] = ["AA", "DL", "UA", "WN", "B6"];

/// Deterministic synthetic month of flights spread over a few hubs.
fn synthetic_records(per_day: usize, days: i64) -> Vec<FlightRecord> {
    let first = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let mut records = Vec::with_capacity(per_day * days as usize);
    for day in 0..days {
        let date = first + Duration::days(day);
        for i in 0..per_day {
            let minute = ((i * 37) % 1440) as u32;
            let delay = ((i * 13) % 90) as i32 - 10;
            records.push(FlightRecord {
                id: RecordId::new(0),
                date,
                airline: AIRLINES[i % AIRLINES.len()].to_string(),
                flight_number: i as u32 + 1,
                tail_number: None,
                origin: AIRPORTS[i % AIRPORTS.len()].to_string(),
                destination: AIRPORTS[(i + 1) % AIRPORTS.len()].to_string(),
                scheduled_departure: NaiveTime::from_hms_opt(minute / 60, minute % 60, 0),
                scheduled_arrival: None,
                actual_departure: None,
                actual_arrival: None,
                departure_delay: Some(delay),
                arrival_delay: Some(delay - 5),
                air_time: Some(40 + (i % 300) as u32),
                distance: None,
                taxi_out: None,
                taxi_in: None,
                diverted: false,
                cancelled: i % 50 == 0,
                cancellation_reason: None,
                delay_causes: DelayCauses {
                    late_aircraft: (delay > 15).then_some(delay as u32),
                    ..Default::default()
                },
            });
        }
    }
    records
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let store = RecordStore::new(synthetic_records(2000, 31), AirlineLookup::builtin());
    let date = NaiveDate::from_ymd_opt(2015, 1, 15).unwrap();

    let airport_day = FilterSpec::all().at_airport("ORD").on_date(date);
    group.bench_function("airport_day", |b| {
        b.iter(|| store.select(black_box(&airport_day)).unwrap().len());
    });

    let airline_month = FilterSpec::all().with_airline("DL");
    group.bench_function("airline_month", |b| {
        b.iter(|| store.select(black_box(&airline_month)).unwrap().len());
    });

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeline_layout");
    let config = LayoutConfig::default();
    let date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();

    for per_day in [600usize, 3000, 12000] {
        let store = RecordStore::new(synthetic_records(per_day, 1), AirlineLookup::builtin());
        let records = store
            .select(&FilterSpec::all().at_airport("ATL").on_date(date))
            .unwrap();
        group.bench_with_input(
            BenchmarkId::new("departures", records.len()),
            &records,
            |b, records| {
                b.iter(|| layout(black_box(records), &config));
            },
        );
    }

    group.finish();
}

fn bench_aggregations(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregations");
    let store = RecordStore::new(synthetic_records(2000, 31), AirlineLookup::builtin());
    let records = store.select(&FilterSpec::all()).unwrap();

    group.bench_function("daily_trend", |b| b.iter(|| daily_trend(black_box(&records))));
    group.bench_function("airline_performance", |b| {
        b.iter(|| airline_performance(black_box(&records)))
    });
    group.bench_function("cause_breakdown", |b| {
        b.iter(|| cause_breakdown(black_box(&records)))
    });

    group.finish();
}

criterion_group!(benches, bench_select, bench_layout, bench_aggregations);
criterion_main!(benches);
