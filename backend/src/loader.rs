//! CSV ingestion of the DOT on-time performance table.
//!
//! Columns are read with polars and cast to the types the model expects, so
//! files where pandas-style exports wrote `12.0` for integers, or where an
//! airport column was inferred as numeric, load the same way.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use log::{info, warn};
use polars::prelude::*;

use crate::config::DataSettings;
use crate::error::{AnalyticsError, AnalyticsResult, ErrorContext};
use crate::models::{
    clock_from_hhmm, AirlineInfo, AirlineLookup, CancellationReason, DelayCauses, FlightRecord,
    RecordId,
};
use crate::store::RecordStore;

const REQUIRED_COLUMNS: [&str; 7] = [
    "YEAR",
    "MONTH",
    "DAY",
    "AIRLINE",
    "FLIGHT_NUMBER",
    "ORIGIN_AIRPORT",
    "DESTINATION_AIRPORT",
];

/// Records read from a flights file plus the rows that could not be used.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<FlightRecord>,
    pub skipped_rows: usize,
}

/// Parse CSV file into a Polars DataFrame
pub fn read_csv_frame(csv_path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV {}", csv_path.display()))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Option<Float64Chunked>> {
    match df.column(name) {
        Ok(column) => {
            let cast = column
                .cast(&DataType::Float64)
                .with_context(|| format!("Column {} is not numeric", name))?;
            Ok(Some(cast.f64()?.clone()))
        }
        Err(_) => Ok(None),
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Option<StringChunked>> {
    match df.column(name) {
        Ok(column) => {
            let cast = column.cast(&DataType::String)?;
            Ok(Some(cast.str()?.clone()))
        }
        Err(_) => Ok(None),
    }
}

fn value(column: &Option<Float64Chunked>, row: usize) -> Option<f64> {
    column.as_ref().and_then(|c| c.get(row)).filter(|v| v.is_finite())
}

fn text(column: &Option<StringChunked>, row: usize) -> Option<String> {
    column
        .as_ref()
        .and_then(|c| c.get(row))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn clock(column: &Option<Float64Chunked>, row: usize) -> Option<NaiveTime> {
    value(column, row).and_then(|v| clock_from_hhmm(v.round() as i64))
}

fn minutes(column: &Option<Float64Chunked>, row: usize) -> Option<u32> {
    value(column, row)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u32)
}

fn signed_minutes(column: &Option<Float64Chunked>, row: usize) -> Option<i32> {
    value(column, row).map(|v| v.round() as i32)
}

fn flag(column: &Option<Float64Chunked>, row: usize) -> bool {
    value(column, row).is_some_and(|v| v > 0.5)
}

/// Convert a flights DataFrame to records. Rows missing a date, carrier,
/// flight number or airport are skipped and counted.
pub fn dataframe_to_records(df: &DataFrame) -> Result<LoadReport> {
    for name in REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            anyhow::bail!("Missing required column {}", name);
        }
    }

    let year = float_column(df, "YEAR")?;
    let month = float_column(df, "MONTH")?;
    let day = float_column(df, "DAY")?;
    let carrier = string_column(df, "AIRLINE")?;
    let flight_number = float_column(df, "FLIGHT_NUMBER")?;
    let tail_number = string_column(df, "TAIL_NUMBER")?;
    let origin_airport = string_column(df, "ORIGIN_AIRPORT")?;
    let destination_airport = string_column(df, "DESTINATION_AIRPORT")?;
    let scheduled_departure = float_column(df, "SCHEDULED_DEPARTURE")?;
    let departure_time = float_column(df, "DEPARTURE_TIME")?;
    let departure_delay = float_column(df, "DEPARTURE_DELAY")?;
    let taxi_out = float_column(df, "TAXI_OUT")?;
    let air_time = float_column(df, "AIR_TIME")?;
    let distance = float_column(df, "DISTANCE")?;
    let taxi_in = float_column(df, "TAXI_IN")?;
    let scheduled_arrival = float_column(df, "SCHEDULED_ARRIVAL")?;
    let arrival_time = float_column(df, "ARRIVAL_TIME")?;
    let arrival_delay = float_column(df, "ARRIVAL_DELAY")?;
    let diverted = float_column(df, "DIVERTED")?;
    let cancelled = float_column(df, "CANCELLED")?;
    let cancellation_reason = string_column(df, "CANCELLATION_REASON")?;
    let air_system_delay = float_column(df, "AIR_SYSTEM_DELAY")?;
    let security_delay = float_column(df, "SECURITY_DELAY")?;
    let airline_delay = float_column(df, "AIRLINE_DELAY")?;
    let late_aircraft_delay = float_column(df, "LATE_AIRCRAFT_DELAY")?;
    let weather_delay = float_column(df, "WEATHER_DELAY")?;

    let height = df.height();
    let mut report = LoadReport {
        records: Vec::with_capacity(height),
        skipped_rows: 0,
    };

    for row in 0..height {
        let date = match (value(&year, row), value(&month, row), value(&day, row)) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y as i32, m as u32, d as u32),
            _ => None,
        };
        let (Some(date), Some(airline), Some(number), Some(origin), Some(destination)) = (
            date,
            text(&carrier, row),
            value(&flight_number, row),
            text(&origin_airport, row),
            text(&destination_airport, row),
        ) else {
            report.skipped_rows += 1;
            continue;
        };

        report.records.push(FlightRecord {
            id: RecordId(row),
            date,
            airline,
            flight_number: number.max(0.0) as u32,
            tail_number: text(&tail_number, row),
            origin,
            destination,
            scheduled_departure: clock(&scheduled_departure, row),
            scheduled_arrival: clock(&scheduled_arrival, row),
            actual_departure: clock(&departure_time, row),
            actual_arrival: clock(&arrival_time, row),
            departure_delay: signed_minutes(&departure_delay, row),
            arrival_delay: signed_minutes(&arrival_delay, row),
            air_time: minutes(&air_time, row),
            distance: minutes(&distance, row),
            taxi_out: minutes(&taxi_out, row),
            taxi_in: minutes(&taxi_in, row),
            diverted: flag(&diverted, row),
            cancelled: flag(&cancelled, row),
            cancellation_reason: text(&cancellation_reason, row)
                .and_then(|code| CancellationReason::from_code(&code)),
            delay_causes: DelayCauses {
                weather: minutes(&weather_delay, row),
                airline: minutes(&airline_delay, row),
                air_system: minutes(&air_system_delay, row),
                security: minutes(&security_delay, row),
                late_aircraft: minutes(&late_aircraft_delay, row),
            },
        });
    }

    Ok(report)
}

/// Read `flights.csv` into records.
pub fn load_flights_csv(csv_path: &Path) -> Result<LoadReport> {
    let df = read_csv_frame(csv_path)?;
    let report = dataframe_to_records(&df)
        .with_context(|| format!("Failed to read flights from {}", csv_path.display()))?;
    if report.skipped_rows > 0 {
        warn!(
            "Skipped {} of {} rows in {} (missing date, carrier, flight number or airport)",
            report.skipped_rows,
            df.height(),
            csv_path.display()
        );
    }
    Ok(report)
}

/// Read an `airlines.csv` (`IATA_CODE`, `AIRLINE`, optional `COLOR`).
/// Carriers without a color get their built-in brand color or grey.
pub fn load_airlines_csv(csv_path: &Path) -> Result<AirlineLookup> {
    let df = read_csv_frame(csv_path)?;
    let codes = string_column(&df, "IATA_CODE")?;
    let names = string_column(&df, "AIRLINE")?;
    let colors = string_column(&df, "COLOR")?;
    if codes.is_none() || names.is_none() {
        anyhow::bail!("Airline file needs IATA_CODE and AIRLINE columns");
    }

    let mut lookup = AirlineLookup::new();
    for row in 0..df.height() {
        let Some(code) = text(&codes, row) else {
            continue;
        };
        let name = text(&names, row).unwrap_or_else(|| code.clone());
        let color = text(&colors, row)
            .unwrap_or_else(|| AirlineLookup::builtin_color(&code).to_string());
        lookup.insert(AirlineInfo::new(code, name, color));
    }
    Ok(lookup)
}

/// Build the store from the configured input files.
pub fn load_store(data: &DataSettings) -> AnalyticsResult<RecordStore> {
    let airlines = match data.airlines_csv {
        Some(ref path) => load_airlines_csv(path).map_err(|e| load_error(path, e))?,
        None => AirlineLookup::builtin(),
    };
    let report =
        load_flights_csv(&data.flights_csv).map_err(|e| load_error(&data.flights_csv, e))?;
    info!(
        "Loaded {} flights from {}",
        report.records.len(),
        data.flights_csv.display()
    );
    Ok(RecordStore::new(report.records, airlines))
}

fn load_error(path: &Path, err: anyhow::Error) -> AnalyticsError {
    AnalyticsError::load_with_context(
        format!("{:#}", err),
        ErrorContext::new("load_store").with_entity_id(path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const HEADER: &str = "YEAR,MONTH,DAY,DAY_OF_WEEK,AIRLINE,FLIGHT_NUMBER,TAIL_NUMBER,ORIGIN_AIRPORT,DESTINATION_AIRPORT,SCHEDULED_DEPARTURE,DEPARTURE_TIME,DEPARTURE_DELAY,TAXI_OUT,WHEELS_OFF,SCHEDULED_TIME,ELAPSED_TIME,AIR_TIME,DISTANCE,WHEELS_ON,TAXI_IN,SCHEDULED_ARRIVAL,ARRIVAL_TIME,ARRIVAL_DELAY,DIVERTED,CANCELLED,CANCELLATION_REASON,AIR_SYSTEM_DELAY,SECURITY_DELAY,AIRLINE_DELAY,LATE_AIRCRAFT_DELAY,WEATHER_DELAY";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_flights() {
        let file = write_csv(&[
            HEADER,
            "2015,1,1,4,AS,98,N407AS,ANC,SEA,5,2354,-11.0,21.0,15,205.0,194.0,169.0,1448,404,4.0,430,408,-22.0,0,0,,,,,,",
            "2015,1,1,4,AA,2336,N3KUAA,LAX,PBI,2400,2,-8.0,12.0,14,280.0,279.0,263.0,2330,737,4.0,750,741,-9.0,0,0,,,,,,",
            "2015,1,1,4,UA,1197,N78448,SFO,IAH,20,,,,,217.0,,,1635,,,457,,,0,1,B,,,,,",
            "2015,1,1,4,DL,1234,N123DL,ATL,ORD,800,830,30.0,10.0,840,120.0,125.0,100.0,606,1020,5.0,1000,1035,35.0,0,0,,5,0,10,20,0",
        ]);

        let report = load_flights_csv(file.path()).unwrap();
        assert_eq!(report.skipped_rows, 0);
        assert_eq!(report.records.len(), 4);

        let alaska = &report.records[0];
        assert_eq!(alaska.date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(alaska.tail_number.as_deref(), Some("N407AS"));
        assert_eq!(alaska.scheduled_departure, NaiveTime::from_hms_opt(0, 5, 0));
        assert_eq!(alaska.departure_delay, Some(-11));
        assert_eq!(alaska.air_time, Some(169));
        assert!(!alaska.delay_causes.any_reported());

        let american = &report.records[1];
        assert_eq!(american.scheduled_departure, NaiveTime::from_hms_opt(0, 0, 0));

        let united = &report.records[2];
        assert!(united.cancelled);
        assert_eq!(united.cancellation_reason, Some(CancellationReason::Weather));
        assert_eq!(united.actual_departure, None);
        assert_eq!(united.departure_delay, None);
        assert_eq!(united.integrity_issue(), None);

        let delta = &report.records[3];
        assert_eq!(delta.delay_causes.air_system, Some(5));
        assert_eq!(delta.delay_causes.late_aircraft, Some(20));
        assert_eq!(delta.delay_causes.weather, Some(0));
    }

    #[test]
    fn test_rows_missing_required_values_are_skipped() {
        let file = write_csv(&[
            HEADER,
            "2015,1,1,4,AS,98,N407AS,ANC,SEA,5,2354,-11.0,21.0,15,205.0,194.0,169.0,1448,404,4.0,430,408,-22.0,0,0,,,,,,",
            "2015,13,1,4,AS,99,N407AS,ANC,SEA,5,2354,-11.0,21.0,15,205.0,194.0,169.0,1448,404,4.0,430,408,-22.0,0,0,,,,,,",
            "2015,1,1,4,,100,N407AS,ANC,SEA,5,2354,-11.0,21.0,15,205.0,194.0,169.0,1448,404,4.0,430,408,-22.0,0,0,,,,,,",
        ]);
        let report = load_flights_csv(file.path()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped_rows, 2);
    }

    #[test]
    fn test_missing_required_column() {
        let file = write_csv(&["YEAR,MONTH,DAY", "2015,1,1"]);
        let err = load_flights_csv(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("AIRLINE"));
    }

    #[test]
    fn test_load_airlines() {
        let file = write_csv(&[
            "IATA_CODE,AIRLINE",
            "UA,United Air Lines Inc.",
            "ZZ,Zed Air",
        ]);
        let lookup = load_airlines_csv(file.path()).unwrap();
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.get("UA").unwrap().color, "#0078D2");
        assert_eq!(lookup.get("ZZ").unwrap().color, "#808080");
        assert_eq!(lookup.get("ZZ").unwrap().name, "Zed Air");
    }

    #[test]
    fn test_load_store() {
        let file = write_csv(&[
            HEADER,
            "2015,1,2,5,DL,1234,N123DL,ATL,ORD,800,830,30.0,10.0,840,120.0,125.0,100.0,606,1020,5.0,1000,1035,35.0,0,0,,5,0,10,20,0",
            "2015,1,1,4,AS,98,N407AS,ANC,SEA,5,2354,-11.0,21.0,15,205.0,194.0,169.0,1448,404,4.0,430,408,-22.0,0,0,,,,,,",
        ]);
        let data = DataSettings {
            flights_csv: PathBuf::from(file.path()),
            airlines_csv: None,
        };
        let store = load_store(&data).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].airline, "AS");
        assert_eq!(store.records()[0].id, RecordId(0));
    }

    #[test]
    fn test_load_store_missing_file() {
        let data = DataSettings {
            flights_csv: PathBuf::from("/nonexistent/flights.csv"),
            airlines_csv: None,
        };
        let err = load_store(&data).unwrap_err();
        assert!(matches!(err, AnalyticsError::Load { .. }));
        assert_eq!(err.context().entity_id.as_deref(), Some("/nonexistent/flights.csv"));
    }
}
