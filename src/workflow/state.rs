//! Per-run plan state.

use uuid::Uuid;

use crate::types::{
    Attraction, DaySchedule, FailureKind, FailureRecord, Hotel, RouteSummary, TripRequest,
    WeatherReport,
};

/// The single state value threaded through the node pipeline.
///
/// Exactly one instance exists per planning run. Nodes take it by value and
/// return an updated copy, so a node can never observe a predecessor's
/// partially-applied update.
#[derive(Debug, Clone)]
pub struct PlanState {
    pub run_id: Uuid,
    pub request: TripRequest,
    pub attractions: Vec<Attraction>,
    pub hotels: Vec<Hotel>,
    pub weather: Option<WeatherReport>,
    pub route: Option<RouteSummary>,
    pub days: Vec<DaySchedule>,
    pub overview: String,
    /// Append-only diagnostic log; becomes the result's warnings list.
    pub failures: Vec<FailureRecord>,
}

impl PlanState {
    /// Seed a fresh state from an accepted request.
    pub fn seed(request: TripRequest) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            request,
            attractions: Vec::new(),
            hotels: Vec::new(),
            weather: None,
            route: None,
            days: Vec::new(),
            overview: String::new(),
            failures: Vec::new(),
        }
    }

    /// Record a non-fatal failure. Records are never removed.
    pub fn record_failure(
        &mut self,
        node: &str,
        tool: Option<&str>,
        kind: FailureKind,
        message: impl Into<String>,
    ) {
        self.failures
            .push(FailureRecord::new(node, tool, kind, message));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::Pace;

    #[test]
    fn seed_starts_empty_with_unique_run_id() {
        let request = TripRequest {
            origin_city: "Shanghai".into(),
            destination_city: "Hangzhou".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
            days: 3,
            travelers: 1,
            budget_level: None,
            hotel_level: None,
            preferences: vec![],
            pace: Pace::Balanced,
        };
        let a = PlanState::seed(request.clone());
        let b = PlanState::seed(request);
        assert!(a.attractions.is_empty());
        assert!(a.failures.is_empty());
        assert_ne!(a.run_id, b.run_id);
    }
}
