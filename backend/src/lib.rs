//! # Airops Backend
//!
//! Flight operations analytics engine.
//!
//! This crate loads a historical flight table (schedule, actual times, delay
//! causes, cancellations) into memory and serves two kinds of derived views:
//! a collision-free per-airport daily timeline ("Air Gantt") and aggregate
//! delay analytics. The backend exposes a REST API via Axum for the
//! dashboard frontend.
//!
//! ## Features
//!
//! - **Data Loading**: Parse the DOT on-time CSV with polars
//! - **Selection**: Indexed filtering by airline, date, airport and date range
//! - **Analytics**: Daily trends, carrier ranking, hourly cascade, delay causes,
//!   weekday distribution, worst airports, KPIs, severity and insights
//! - **Timeline Layout**: Minimal-lane placement of departures per airport-day
//! - **Caching**: LRU memoization with single-flight coalescing
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! - [`models`]: Flight records, carrier lookup and filter specifications
//! - [`store`]: The immutable in-memory record store and its indexes
//! - [`services`]: Aggregations, timeline layout, cache and the analytics façade
//! - [`api`]: Result types handed to the renderer
//! - [`loader`]: CSV ingestion
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

#[cfg(feature = "csv-loader")]
pub mod loader;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{AnalyticsError, AnalyticsResult};
