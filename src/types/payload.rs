//! Domain payloads produced by tool calls.
//!
//! These are the shapes the orchestrator expects tools to emit. Adapters for
//! concrete providers (see [`crate::amap`]) translate wire responses into
//! them; nodes stay provider-agnostic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tags that mark an attraction as weather-sensitive.
const OUTDOOR_TAGS: &[&str] = &["outdoor", "park", "garden", "scenic", "lake", "beach"];

/// A point-of-interest candidate for the itinerary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attraction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Provider coordinate string, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-form category tags, lowercase.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Attraction {
    /// Whether the attraction should be kept off forecasted-rain days.
    pub fn is_outdoor(&self) -> bool {
        self.tags.iter().any(|tag| {
            let tag = tag.to_ascii_lowercase();
            OUTDOOR_TAGS.iter().any(|marker| tag.contains(marker))
        })
    }
}

/// A lodging candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hotel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Tier keyword the candidate was searched under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// One day of forecast for the destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Condition text, e.g. "light rain" or "晴".
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<String>,
}

impl WeatherDay {
    /// Condition heuristics cover the English and Chinese wording the
    /// supported providers emit.
    pub fn is_rainy(&self) -> bool {
        let condition = self.condition.to_ascii_lowercase();
        condition.contains("rain")
            || condition.contains("shower")
            || condition.contains("storm")
            || condition.contains('雨')
    }
}

/// Forecast for the destination across the trip date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub days: Vec<WeatherDay>,
}

impl WeatherReport {
    /// Forecast for a 1-based trip day, when the range covers it.
    pub fn day(&self, day_index: u32) -> Option<&WeatherDay> {
        self.days.get(day_index.checked_sub(1)? as usize)
    }
}

/// Summary of the door-to-door route between origin and destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteSummary {
    /// Distance in meters, provider formatting preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    /// Duration in seconds, provider formatting preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxi_cost: Option<String>,
}

impl RouteSummary {
    /// Render a one-line human summary, tolerating missing fields.
    pub fn describe(&self, origin: &str, destination: &str) -> String {
        let mut parts = Vec::new();
        if let Some(km) = self.distance.as_deref().and_then(parse_f64) {
            parts.push(format!("{:.0} km", km / 1000.0));
        }
        if let Some(secs) = self.duration.as_deref().and_then(parse_f64) {
            let minutes = (secs / 60.0).round() as u64;
            parts.push(format!("{}h{:02}m drive", minutes / 60, minutes % 60));
        }
        if parts.is_empty() {
            format!("{origin} to {destination}")
        } else {
            format!("{origin} to {destination}, about {}", parts.join(", "))
        }
    }
}

fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outdoor_detection_matches_tag_substrings() {
        let lake = Attraction {
            name: "West Lake".into(),
            address: None,
            location: None,
            tags: vec!["Scenic Area".into()],
        };
        let museum = Attraction {
            name: "Silk Museum".into(),
            address: None,
            location: None,
            tags: vec!["museum".into()],
        };
        assert!(lake.is_outdoor());
        assert!(!museum.is_outdoor());
    }

    #[test]
    fn rain_heuristic_covers_both_languages() {
        let rainy = WeatherDay {
            date: None,
            condition: "Light Rain".into(),
            high: None,
            low: None,
        };
        let chinese = WeatherDay {
            date: None,
            condition: "小雨".into(),
            high: None,
            low: None,
        };
        let clear = WeatherDay {
            date: None,
            condition: "sunny".into(),
            high: None,
            low: None,
        };
        assert!(rainy.is_rainy());
        assert!(chinese.is_rainy());
        assert!(!clear.is_rainy());
    }

    #[test]
    fn route_description_tolerates_missing_fields() {
        let full = RouteSummary {
            distance: Some("180000".into()),
            duration: Some("7200".into()),
            taxi_cost: None,
        };
        assert_eq!(
            full.describe("Shanghai", "Hangzhou"),
            "Shanghai to Hangzhou, about 180 km, 2h00m drive"
        );
        let empty = RouteSummary::default();
        assert_eq!(empty.describe("A", "B"), "A to B");
    }
}
