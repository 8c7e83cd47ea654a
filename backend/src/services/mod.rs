//! Service layer: aggregation engines, timeline layout and the cached
//! analytics façade.
//!
//! The engines are pure functions over slices of records borrowed from the
//! [`RecordStore`](crate::store::RecordStore); they never fail and return
//! empty or null-filled results for empty input. [`AnalyticsService`] adds
//! filter validation and memoization on top.

pub mod analytics;
pub mod cache;
pub mod causes;
pub mod insights;
pub mod performance;
pub mod timeline;
pub mod trends;

mod stats;

pub use analytics::{
    compute_derived, AnalyticsService, CacheKey, DerivedKind, DerivedResult, EngineSettings,
};
pub use cache::{CacheStats, DerivedMetricsCache};
pub use causes::cause_breakdown;
pub use insights::{delay_severity, insights, summary};
pub use performance::{airline_performance, worst_airports};
pub use timeline::{layout, visual_span, LayoutConfig};
pub use trends::{daily_trend, day_of_week_distribution, hourly_cascade};
