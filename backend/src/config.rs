//! Application configuration file support.
//!
//! Settings are read from `airops.toml`. Every field has a default, so an
//! empty file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyticsError, ErrorContext};
use crate::services::timeline::LayoutConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "AIROPS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub timeline: TimelineSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_flights_csv")]
    pub flights_csv: PathBuf,
    /// When absent the built-in carrier table is used.
    #[serde(default)]
    pub airlines_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSettings {
    #[serde(default = "default_min_gap_minutes")]
    pub min_gap_minutes: u32,
    #[serde(default = "default_min_visual_width_minutes")]
    pub min_visual_width_minutes: u32,
    #[serde(default)]
    pub lane_capacity: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Airports with fewer flights are left out of the worst-airport ranking.
    #[serde(default = "default_min_airport_flights")]
    pub min_airport_flights: usize,
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_flights_csv() -> PathBuf {
    PathBuf::from("data/flights.csv")
}

fn default_cache_capacity() -> usize {
    256
}

fn default_min_gap_minutes() -> u32 {
    5
}

fn default_min_visual_width_minutes() -> u32 {
    15
}

fn default_min_airport_flights() -> usize {
    5
}

fn default_top_n() -> usize {
    10
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            flights_csv: default_flights_csv(),
            airlines_csv: None,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            min_gap_minutes: default_min_gap_minutes(),
            min_visual_width_minutes: default_min_visual_width_minutes(),
            lane_capacity: None,
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            min_airport_flights: default_min_airport_flights(),
            default_top_n: default_top_n(),
        }
    }
}

impl TimelineSettings {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            min_gap_minutes: self.min_gap_minutes,
            min_visual_width_minutes: self.min_visual_width_minutes,
            lane_capacity: self.lane_capacity,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalyticsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AnalyticsError::Configuration {
            message: format!("Failed to read config file: {}", e),
            context: ErrorContext::new("load_config").with_entity_id(path.display()),
        })?;

        Self::from_toml_str(&content).map_err(|e| e.with_operation("load_config"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, AnalyticsError> {
        toml::from_str(content).map_err(|e| {
            AnalyticsError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Search for `airops.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists in any of them.
    pub fn from_default_location() -> Result<Option<Self>, AnalyticsError> {
        let search_paths = [
            PathBuf::from("airops.toml"),
            PathBuf::from("backend/airops.toml"),
            PathBuf::from("../airops.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Using configuration file {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }

        Ok(None)
    }

    /// Resolve configuration: `AIROPS_CONFIG` if set, then the default
    /// locations, then built-in defaults.
    pub fn load() -> Result<Self, AnalyticsError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }
        Ok(Self::from_default_location()?.unwrap_or_default())
    }
}
