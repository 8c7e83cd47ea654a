//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::AnalyticsService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Analytics façade owning the record store and the derived-result cache
    pub service: Arc<AnalyticsService>,
    /// Ranking length used when a request does not pass `top`
    pub default_top_n: usize,
}

impl AppState {
    /// Create a new application state around `service`.
    pub fn new(service: Arc<AnalyticsService>, default_top_n: usize) -> Self {
        Self {
            service,
            default_top_n,
        }
    }

    pub fn from_config(service: Arc<AnalyticsService>, config: &AppConfig) -> Self {
        Self::new(service, config.analytics.default_top_n)
    }
}
