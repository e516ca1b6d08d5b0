//! Final plan document types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Attraction, FailureRecord, Hotel, RouteSummary, TripRequest, WeatherReport};

/// One day of the itinerary.
///
/// After a successful run, `day_index` values are unique, 1-based, and form
/// a contiguous range matching the requested trip length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySchedule {
    pub day_index: u32,
    pub title: String,
    /// Ordered schedule entries, free-form text.
    pub schedule: Vec<String>,
}

/// The complete plan document assembled by the planner node.
///
/// Serializable even when some nodes degraded: optional sections stay empty
/// rather than failing the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub overview: String,
    pub days: Vec<DaySchedule>,
    #[serde(default)]
    pub attractions: Vec<Attraction>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteSummary>,
}

/// Successful outcome of a planning run: a best-effort plan plus every
/// non-fatal diagnostic recorded along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    pub run_id: Uuid,
    pub request: TripRequest,
    pub plan: TripPlan,
    /// Non-fatal failures encountered while planning; empty on a clean run.
    #[serde(default)]
    pub warnings: Vec<FailureRecord>,
}

impl PlanResult {
    /// Whether any node degraded during the run.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
