//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! [`AnalyticsService`](crate::services::AnalyticsService) for selection,
//! computation and caching.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{
    AirlineListResponse, AirportListResponse, AirportsQuery, DerivedResponse, FilterQuery,
    HealthResponse, TimelineQuery, TimelineResponse, WorstAirportsQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::AirportRole;
use crate::models::FilterSpec;
use crate::services::{CacheStats, DerivedKind, DerivedResult};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Compute (or fetch from cache) one derived view and wrap it with its filter.
async fn derived(
    state: &AppState,
    filter: FilterSpec,
    kind: DerivedKind,
) -> HandlerResult<DerivedResponse> {
    let result = state.service.get_or_compute(filter.clone(), kind).await?;
    Ok(Json(DerivedResponse::new(filter, Arc::unwrap_or_clone(result))))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint reporting dataset size and cache counters.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store = state.service.store();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        records: store.len(),
        date_span: store.date_span(),
        cache: state.service.cache_stats(),
    }))
}

// =============================================================================
// Reference Data
// =============================================================================

/// GET /v1/airlines
///
/// List every carrier known to the store, with display name and color.
pub async fn list_airlines(State(state): State<AppState>) -> HandlerResult<AirlineListResponse> {
    let airlines: Vec<_> = state.service.store().airlines().iter().cloned().collect();
    let total = airlines.len();
    Ok(Json(AirlineListResponse { airlines, total }))
}

/// GET /v1/airports?date=YYYY-MM-DD&airline=XX
///
/// Origins with at least one operated departure on the given day.
pub async fn list_airports(
    State(state): State<AppState>,
    Query(query): Query<AirportsQuery>,
) -> HandlerResult<AirportListResponse> {
    let airline = query
        .airline
        .filter(|s| !s.is_empty())
        .map(|s| s.to_uppercase());
    let airports = state
        .service
        .store()
        .origins_for(airline.as_deref(), query.date)?;

    Ok(Json(AirportListResponse {
        date: query.date,
        airline,
        airports,
    }))
}

// =============================================================================
// Timeline
// =============================================================================

/// GET /v1/timeline?airport=XXX&date=YYYY-MM-DD&airline=XX
///
/// Lane layout of one airport-day, joined with record and carrier data.
pub async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> HandlerResult<TimelineResponse> {
    let filter = query.into_filter();
    let result = state
        .service
        .get_or_compute(filter.clone(), DerivedKind::Timeline)
        .await?;

    match result.as_ref() {
        DerivedResult::Timeline(layout) => Ok(Json(TimelineResponse::build(
            filter,
            layout,
            state.service.store(),
        ))),
        _ => Err(AppError::Internal(
            "timeline computation returned a different result kind".to_string(),
        )),
    }
}

// =============================================================================
// Analytics Endpoints
// =============================================================================

/// GET /v1/analytics/daily-trend
pub async fn get_daily_trend(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    derived(&state, filter, DerivedKind::DailyTrend).await
}

/// GET /v1/analytics/airline-performance
///
/// Carriers ranked by on-time ratio.
pub async fn get_airline_performance(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    derived(&state, filter, DerivedKind::AirlinePerformance).await
}

/// GET /v1/analytics/hourly-cascade
pub async fn get_hourly_cascade(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    derived(&state, filter, DerivedKind::HourlyCascade).await
}

/// GET /v1/analytics/cause-breakdown
pub async fn get_cause_breakdown(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    derived(&state, filter, DerivedKind::CauseBreakdown).await
}

/// GET /v1/analytics/worst-airports?role=departure|arrival&top=N
pub async fn get_worst_airports(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
    Query(ranking): Query<WorstAirportsQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    let top_n = ranking.top.unwrap_or(state.default_top_n);
    if top_n == 0 {
        return Err(AppError::BadRequest("top must be at least 1".to_string()));
    }
    let kind = DerivedKind::WorstAirports {
        role: ranking.role.unwrap_or(AirportRole::Departure),
        top_n,
    };
    derived(&state, filter, kind).await
}

/// GET /v1/analytics/day-of-week
pub async fn get_day_of_week(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    derived(&state, filter, DerivedKind::DayOfWeek).await
}

/// GET /v1/analytics/summary
///
/// Headline KPIs for the selection.
pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    derived(&state, filter, DerivedKind::Summary).await
}

/// GET /v1/analytics/delay-severity
pub async fn get_delay_severity(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    derived(&state, filter, DerivedKind::DelaySeverity).await
}

/// GET /v1/analytics/insights
pub async fn get_insights(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<DerivedResponse> {
    let filter = query.into_filter(state.service.store());
    derived(&state, filter, DerivedKind::Insights).await
}

// =============================================================================
// Cache
// =============================================================================

/// GET /v1/cache/stats
pub async fn get_cache_stats(State(state): State<AppState>) -> HandlerResult<CacheStats> {
    Ok(Json(state.service.cache_stats()))
}
