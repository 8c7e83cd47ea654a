//! HTTP server module for the analytics backend.
//!
//! This module provides an axum-based HTTP server that exposes the record
//! store and the analytics service as a REST API for the dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query parsing into FilterSpec                          │
//! │  - JSON serialization                                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  AnalyticsService (services/analytics.rs)                 │
//! │  - Filter validation                                      │
//! │  - Memoized aggregations and timeline layout              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  RecordStore (store/)                                     │
//! │  - Immutable flight table and partition indexes           │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
