//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Read-only API; the dashboard may be served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let analytics = Router::new()
        .route("/daily-trend", get(handlers::get_daily_trend))
        .route("/airline-performance", get(handlers::get_airline_performance))
        .route("/hourly-cascade", get(handlers::get_hourly_cascade))
        .route("/cause-breakdown", get(handlers::get_cause_breakdown))
        .route("/worst-airports", get(handlers::get_worst_airports))
        .route("/day-of-week", get(handlers::get_day_of_week))
        .route("/summary", get(handlers::get_summary))
        .route("/delay-severity", get(handlers::get_delay_severity))
        .route("/insights", get(handlers::get_insights));

    let api_v1 = Router::new()
        // Reference data
        .route("/airlines", get(handlers::list_airlines))
        .route("/airports", get(handlers::list_airports))
        // Air Gantt
        .route("/timeline", get(handlers::get_timeline))
        .nest("/analytics", analytics)
        .route("/cache/stats", get(handlers::get_cache_stats));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
