//! Entry point used by the HTTP layer: select, compute, memoize.

use std::sync::Arc;
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use super::cache::{CacheStats, DerivedMetricsCache};
use super::causes::cause_breakdown;
use super::insights::{delay_severity, insights, summary};
use super::performance::{airline_performance, worst_airports};
use super::timeline::{layout, LayoutConfig};
use super::trends::{daily_trend, day_of_week_distribution, hourly_cascade};
use crate::api::{
    AirlinePerformance, AirportDelay, AirportRole, CauseBreakdown, DailyTrendPoint,
    DelaySeverity, HourlyBucket, OperationalInsights, SummaryMetrics, TimelineLayout,
    WeekdayBucket,
};
use crate::config::AppConfig;
use crate::error::{AnalyticsError, AnalyticsResult, ErrorContext};
use crate::models::FilterSpec;
use crate::store::RecordStore;

/// Which derived view to produce for a filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedKind {
    DailyTrend,
    AirlinePerformance,
    HourlyCascade,
    CauseBreakdown,
    WorstAirports { role: AirportRole, top_n: usize },
    DayOfWeek,
    Summary,
    DelaySeverity,
    Insights,
    /// Requires a filter naming one airport and one date.
    Timeline,
}

impl DerivedKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DailyTrend => "daily_trend",
            Self::AirlinePerformance => "airline_performance",
            Self::HourlyCascade => "hourly_cascade",
            Self::CauseBreakdown => "cause_breakdown",
            Self::WorstAirports { .. } => "worst_airports",
            Self::DayOfWeek => "day_of_week",
            Self::Summary => "summary",
            Self::DelaySeverity => "delay_severity",
            Self::Insights => "insights",
            Self::Timeline => "timeline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum DerivedResult {
    DailyTrend(Vec<DailyTrendPoint>),
    AirlinePerformance(Vec<AirlinePerformance>),
    HourlyCascade(Vec<HourlyBucket>),
    CauseBreakdown(CauseBreakdown),
    WorstAirports(Vec<AirportDelay>),
    DayOfWeek(Vec<WeekdayBucket>),
    Summary(SummaryMetrics),
    DelaySeverity(DelaySeverity),
    Insights(OperationalInsights),
    Timeline(TimelineLayout),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub filter: FilterSpec,
    pub kind: DerivedKind,
}

/// Tuning that affects computed results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub layout: LayoutConfig,
    pub min_airport_flights: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            layout: config.timeline.layout_config(),
            min_airport_flights: config.analytics.min_airport_flights,
        }
    }
}

fn check_kind(filter: &FilterSpec, kind: &DerivedKind) -> AnalyticsResult<()> {
    if *kind == DerivedKind::Timeline && filter.airport_day().is_none() {
        return Err(AnalyticsError::invalid_filter_with_context(
            "timeline requires both an airport and a date",
            ErrorContext::new("timeline").with_details(filter.to_string()),
        ));
    }
    Ok(())
}

/// Select the records for `filter` and compute `kind` over them.
pub fn compute_derived(
    store: &RecordStore,
    filter: &FilterSpec,
    kind: &DerivedKind,
    settings: &EngineSettings,
) -> AnalyticsResult<DerivedResult> {
    check_kind(filter, kind)?;
    let records = store.select(filter)?;
    let started = Instant::now();

    let result = match kind {
        DerivedKind::DailyTrend => DerivedResult::DailyTrend(daily_trend(&records)),
        DerivedKind::AirlinePerformance => {
            DerivedResult::AirlinePerformance(airline_performance(&records))
        }
        DerivedKind::HourlyCascade => DerivedResult::HourlyCascade(hourly_cascade(&records)),
        DerivedKind::CauseBreakdown => DerivedResult::CauseBreakdown(cause_breakdown(&records)),
        DerivedKind::WorstAirports { role, top_n } => DerivedResult::WorstAirports(
            worst_airports(&records, *role, *top_n, settings.min_airport_flights),
        ),
        DerivedKind::DayOfWeek => DerivedResult::DayOfWeek(day_of_week_distribution(&records)),
        DerivedKind::Summary => DerivedResult::Summary(summary(&records)),
        DerivedKind::DelaySeverity => DerivedResult::DelaySeverity(delay_severity(&records)),
        DerivedKind::Insights => DerivedResult::Insights(insights(&records)),
        DerivedKind::Timeline => DerivedResult::Timeline(layout(&records, &settings.layout)),
    };

    debug!(
        "computed {} for {} over {} records in {:?}",
        kind.name(),
        filter,
        records.len(),
        started.elapsed()
    );
    Ok(result)
}

/// Owns the store, the engine settings and the derived-result cache.
pub struct AnalyticsService {
    store: Arc<RecordStore>,
    settings: EngineSettings,
    cache: DerivedMetricsCache<CacheKey, DerivedResult>,
}

impl AnalyticsService {
    pub fn new(store: Arc<RecordStore>, settings: EngineSettings, cache_capacity: usize) -> Self {
        Self {
            store,
            settings,
            cache: DerivedMetricsCache::new(cache_capacity),
        }
    }

    pub fn from_config(store: Arc<RecordStore>, config: &AppConfig) -> Self {
        Self::new(store, EngineSettings::from_config(config), config.cache.capacity)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Cached result for `(filter, kind)`. Concurrent requests for the same
    /// pair share one computation, which runs on the blocking thread pool.
    /// Invalid filters are rejected before touching the cache.
    pub async fn get_or_compute(
        &self,
        filter: FilterSpec,
        kind: DerivedKind,
    ) -> AnalyticsResult<Arc<DerivedResult>> {
        self.store.validate(&filter)?;
        check_kind(&filter, &kind)?;

        let key = CacheKey {
            filter: filter.clone(),
            kind: kind.clone(),
        };
        let store = Arc::clone(&self.store);
        let settings = self.settings.clone();

        self.cache
            .get_or_compute(key, move || async move {
                tokio::task::spawn_blocking(move || {
                    compute_derived(&store, &filter, &kind, &settings)
                })
                .await
                .map_err(|e| AnalyticsError::internal(format!("Task join error: {}", e)))?
            })
            .await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{date, FlightBuilder};
    use crate::models::AirlineLookup;

    fn service() -> AnalyticsService {
        let records = vec![
            FlightBuilder::new("UA", 1)
                .route("ORD", "LAX")
                .departs(8, 0)
                .air_time(120)
                .delay(10)
                .build(),
            FlightBuilder::new("AA", 2)
                .route("ORD", "DFW")
                .departs(8, 5)
                .air_time(60)
                .delay(0)
                .build(),
            FlightBuilder::new("DL", 3)
                .route("ORD", "ATL")
                .departs(8, 10)
                .air_time(90)
                .delay(40)
                .build(),
            FlightBuilder::new("DL", 4)
                .route("ATL", "ORD")
                .departs(9, 0)
                .air_time(90)
                .cancelled()
                .build(),
        ];
        let store = Arc::new(RecordStore::new(records, AirlineLookup::builtin()));
        AnalyticsService::new(store, EngineSettings::default(), 16)
    }

    #[test]
    fn test_compute_timeline_requires_airport_day() {
        let svc = service();
        let err = compute_derived(
            svc.store(),
            &FilterSpec::all().at_airport("ORD"),
            &DerivedKind::Timeline,
            svc.settings(),
        )
        .unwrap_err();
        assert!(err.is_invalid_filter());
    }

    #[test]
    fn test_compute_timeline() {
        let svc = service();
        let filter = FilterSpec::all().at_airport("ORD").on_date(date(2015, 7, 4));
        let result =
            compute_derived(svc.store(), &filter, &DerivedKind::Timeline, svc.settings()).unwrap();
        match result {
            DerivedResult::Timeline(layout) => assert_eq!(layout.lane_count, 3),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_or_compute_memoizes() {
        let svc = service();
        let filter = FilterSpec::all().with_airline("DL");
        let first = svc.get_or_compute(filter.clone(), DerivedKind::Summary).await.unwrap();
        let second = svc.get_or_compute(filter, DerivedKind::Summary).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(svc.cache_stats().computations, 1);
    }

    #[tokio::test]
    async fn test_invalid_filter_not_cached() {
        let svc = service();
        let err = svc
            .get_or_compute(FilterSpec::all().with_airline("ZZ"), DerivedKind::Summary)
            .await
            .unwrap_err();
        assert!(err.is_invalid_filter());
        assert_eq!(svc.cache_stats().entries, 0);
        assert_eq!(svc.cache_stats().computations, 0);
    }

    #[test]
    fn test_default_settings_exclude_thin_airports() {
        let mut records: Vec<_> = (1..=5)
            .map(|n| {
                FlightBuilder::new("AA", n)
                    .route("ORD", "LAX")
                    .departs(8, 0)
                    .delay(30)
                    .build()
            })
            .collect();
        records.push(
            FlightBuilder::new("AA", 6)
                .route("ASE", "DEN")
                .departs(9, 0)
                .delay(400)
                .build(),
        );
        let store = RecordStore::new(records, AirlineLookup::builtin());

        let settings = EngineSettings::default();
        assert_eq!(settings.min_airport_flights, 5);
        assert_eq!(settings.layout, LayoutConfig::default());

        let kind = DerivedKind::WorstAirports {
            role: AirportRole::Departure,
            top_n: 10,
        };
        let DerivedResult::WorstAirports(ranking) =
            compute_derived(&store, &FilterSpec::all(), &kind, &settings).unwrap()
        else {
            panic!("expected worst airports");
        };
        let airports: Vec<&str> = ranking.iter().map(|a| a.airport.as_str()).collect();
        assert_eq!(airports, vec!["ORD"]);
    }

    #[test]
    fn test_kind_serializes_with_tag() {
        let kind = DerivedKind::WorstAirports {
            role: AirportRole::Arrival,
            top_n: 5,
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["kind"], "worst_airports");
        assert_eq!(json["role"], "arrival");
        assert_eq!(kind.name(), "worst_airports");
    }
}
