//! Trip request types.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Spending tier for the overall trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Economy,
    Moderate,
    Premium,
}

/// Lodging tier used to filter hotel candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelLevel {
    Budget,
    Comfort,
    Premium,
}

impl HotelLevel {
    /// Search keyword prefix for lodging queries.
    pub fn keyword(self) -> &'static str {
        match self {
            HotelLevel::Budget => "budget",
            HotelLevel::Comfort => "comfort",
            HotelLevel::Premium => "premium",
        }
    }
}

/// How densely the itinerary should be packed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Relaxed,
    #[default]
    Balanced,
    Intense,
}

/// A validated trip-planning request.
///
/// Immutable once accepted by the workflow engine. Field-level validation
/// belongs to the transport boundary; [`TripRequest::validate`] is provided
/// as a convenience for embedding layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// City the trip starts from.
    pub origin_city: String,
    /// City being visited.
    pub destination_city: String,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Trip length in days (1..=30).
    pub days: u32,
    /// Number of travelers (1..=20).
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    /// Overall spending tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<BudgetLevel>,
    /// Lodging tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_level: Option<HotelLevel>,
    /// Ordered free-text preference tags; may be empty.
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Itinerary density.
    #[serde(default)]
    pub pace: Pace,
}

fn default_travelers() -> u32 {
    1
}

impl TripRequest {
    /// Range checks mirroring the boundary layer's constraints.
    pub fn validate(&self) -> Result<(), String> {
        if self.origin_city.trim().is_empty() {
            return Err("origin_city must not be empty".into());
        }
        if self.destination_city.trim().is_empty() {
            return Err("destination_city must not be empty".into());
        }
        if !(1..=30).contains(&self.days) {
            return Err(format!("days must be within 1..=30, got {}", self.days));
        }
        if !(1..=20).contains(&self.travelers) {
            return Err(format!(
                "travelers must be within 1..=20, got {}",
                self.travelers
            ));
        }
        Ok(())
    }

    /// Calendar date of a 1-based day index, if within the trip range.
    pub fn date_for_day(&self, day_index: u32) -> Option<NaiveDate> {
        if day_index == 0 || day_index > self.days {
            return None;
        }
        self.start_date.checked_add_days(Days::new(u64::from(day_index - 1)))
    }
}
