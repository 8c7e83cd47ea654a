//! Carrier reference table: display names and chart colors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Color used for carriers without a brand color.
pub const DEFAULT_AIRLINE_COLOR: &str = "#808080";

/// Display name used for carriers missing from the reference table.
pub const UNKNOWN_AIRLINE_NAME: &str = "Unknown";

/// Display metadata for one carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineInfo {
    pub code: String,
    pub name: String,
    pub color: String,
}

impl AirlineInfo {
    pub fn new(code: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// Placeholder entry for a code seen in the data but not in the table.
    pub fn unknown(code: impl Into<String>) -> Self {
        Self::new(code, UNKNOWN_AIRLINE_NAME, DEFAULT_AIRLINE_COLOR)
    }
}

/// Carrier code → display name and brand color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineLookup {
    entries: BTreeMap<String, AirlineInfo>,
}

const BUILTIN_AIRLINES: [(&str, &str, &str); 14] = [
    ("AA", "American Airlines", "#A2AAAD"),
    ("AS", "Alaska Airlines", "#01426A"),
    ("B6", "JetBlue Airways", "#0047BB"),
    ("DL", "Delta Air Lines", "#C8102E"),
    ("EV", "Atlantic Southeast", "#1E90FF"),
    ("F9", "Frontier Airlines", "#00A859"),
    ("HA", "Hawaiian Airlines", "#7B1FA2"),
    ("MQ", "American Eagle", "#4A4A4A"),
    ("NK", "Spirit Airlines", "#FFE900"),
    ("OO", "SkyWest Airlines", "#FF6B35"),
    ("UA", "United Airlines", "#0078D2"),
    ("US", "US Airways", "#8B0000"),
    ("VX", "Virgin America", "#FF3366"),
    ("WN", "Southwest Airlines", "#304CB2"),
];

impl AirlineLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// The 14 carriers of the 2015 DOT dataset with their brand colors.
    pub fn builtin() -> Self {
        BUILTIN_AIRLINES
            .iter()
            .map(|(code, name, color)| AirlineInfo::new(*code, *name, *color))
            .collect()
    }

    /// Brand color for a carrier in the built-in table.
    pub fn builtin_color(code: &str) -> &'static str {
        BUILTIN_AIRLINES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, _, color)| *color)
            .unwrap_or(DEFAULT_AIRLINE_COLOR)
    }

    pub fn insert(&mut self, info: AirlineInfo) {
        self.entries.insert(info.code.clone(), info);
    }

    pub fn get(&self, code: &str) -> Option<&AirlineInfo> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Entry for `code`, falling back to the grey "Unknown" placeholder.
    pub fn resolve(&self, code: &str) -> AirlineInfo {
        self.get(code)
            .cloned()
            .unwrap_or_else(|| AirlineInfo::unknown(code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by carrier code.
    pub fn iter(&self) -> impl Iterator<Item = &AirlineInfo> {
        self.entries.values()
    }
}

impl FromIterator<AirlineInfo> for AirlineLookup {
    fn from_iter<T: IntoIterator<Item = AirlineInfo>>(iter: T) -> Self {
        let mut lookup = AirlineLookup::new();
        for info in iter {
            lookup.insert(info);
        }
        lookup
    }
}
