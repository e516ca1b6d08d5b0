//! Plan aggregation node.
//!
//! Runs last and never calls external tools: it synthesizes the final
//! day-by-day itinerary from whatever the earlier nodes managed to gather.
//! Attractions are allocated across days according to the requested pace,
//! with outdoor candidates moved off forecasted-rain days when feasible.
//! An optional generative synthesizer may re-narrate the result; its output
//! is untrusted and validated before acceptance.

use std::collections::VecDeque;

use tracing::{info, warn};

use crate::types::{Attraction, DaySchedule, FailureKind};
use crate::workflow::node::{NodeContext, NodeOutcome, NodeRole};
use crate::workflow::state::PlanState;
use crate::workflow::synthesis::parse_draft;

const SLOT_LABELS: &[&str] = &["Morning", "Midday", "Afternoon", "Evening", "Night"];

pub(crate) async fn run(ctx: &NodeContext, mut state: PlanState) -> NodeOutcome {
    let node = NodeRole::Planner.name();
    let day_count = state.request.days as usize;
    let per_day = ctx.config.entries_per_day(state.request.pace);
    info!(days = day_count, per_day, candidates = state.attractions.len(), "assembling plan");

    let rainy = rainy_days(&state, day_count);
    let allocation = allocate_attractions(&state.attractions, day_count, per_day, &rainy);
    state.days = build_days(&state, &allocation, &rainy);
    state.overview = build_overview(&state);

    if let Some(synthesizer) = &ctx.synthesizer {
        let drafted =
            tokio::time::timeout(ctx.config.synthesis_timeout, synthesizer.draft(&state)).await;
        match drafted {
            Ok(Ok(raw)) => match parse_draft(&raw, day_count) {
                Ok(draft) => {
                    if !draft.overview.trim().is_empty() {
                        state.overview = draft.overview;
                    }
                    for (day, drafted_day) in state.days.iter_mut().zip(draft.days) {
                        day.title = drafted_day.title;
                        if !drafted_day.schedule.is_empty() {
                            day.schedule = drafted_day.schedule;
                        }
                    }
                }
                Err(message) => {
                    warn!(%message, "synthesis draft rejected, keeping deterministic rendering");
                    state.record_failure(
                        node,
                        None,
                        FailureKind::InvariantViolation,
                        format!("synthesis draft rejected: {message}"),
                    );
                }
            },
            Ok(Err(e)) => {
                warn!(error = %e, "synthesis call failed, keeping deterministic rendering");
                // Single attempt, so a transient error is terminal here.
                let kind = if e.is_transient() {
                    FailureKind::Exhausted
                } else {
                    e.kind()
                };
                state.record_failure(node, None, kind, e.to_string());
            }
            Err(_) => {
                state.record_failure(
                    node,
                    None,
                    FailureKind::Exhausted,
                    format!(
                        "synthesis timed out after {:.0}s",
                        ctx.config.synthesis_timeout.as_secs_f64()
                    ),
                );
            }
        }
    }

    NodeOutcome::Continue(state)
}

/// Validate the aggregator's structural guarantees: exactly `expected`
/// entries with day_index forming the contiguous range 1..=expected.
pub(crate) fn check_day_invariants(days: &[DaySchedule], expected: u32) -> Result<(), String> {
    if days.len() != expected as usize {
        return Err(format!(
            "plan has {} day schedules, expected {expected}",
            days.len()
        ));
    }
    for (position, day) in days.iter().enumerate() {
        let wanted = position as u32 + 1;
        if day.day_index != wanted {
            return Err(format!(
                "day_index {} at position {position}, expected {wanted}",
                day.day_index
            ));
        }
    }
    Ok(())
}

/// Per-day rain flags for the trip range, false where no forecast exists.
fn rainy_days(state: &PlanState, day_count: usize) -> Vec<bool> {
    (1..=day_count as u32)
        .map(|day_index| {
            state
                .weather
                .as_ref()
                .and_then(|w| w.day(day_index))
                .is_some_and(|d| d.is_rainy())
        })
        .collect()
}

/// Distribute attractions across days, `per_day` each, preserving the
/// discovery order within a day.
///
/// Rainy days draw from the indoor pool first so outdoor candidates land on
/// dry days when feasible; leftover slots on rainy days fall back to the
/// remaining pool rather than staying empty.
fn allocate_attractions(
    attractions: &[Attraction],
    day_count: usize,
    per_day: usize,
    rainy: &[bool],
) -> Vec<Vec<Attraction>> {
    let mut indoor: VecDeque<(usize, &Attraction)> = VecDeque::new();
    let mut outdoor: VecDeque<(usize, &Attraction)> = VecDeque::new();
    for (index, attraction) in attractions.iter().enumerate() {
        if attraction.is_outdoor() {
            outdoor.push_back((index, attraction));
        } else {
            indoor.push_back((index, attraction));
        }
    }

    let mut slots: Vec<Vec<(usize, &Attraction)>> = vec![Vec::new(); day_count];

    for (day, slot) in slots.iter_mut().enumerate() {
        if rainy.get(day).copied().unwrap_or(false) {
            while slot.len() < per_day {
                let Some(pick) = indoor.pop_front() else { break };
                slot.push(pick);
            }
        }
    }

    // Remaining pool in discovery order, shared by dry days and any rainy
    // day the indoor pool could not fill.
    let mut remaining: Vec<(usize, &Attraction)> = indoor.into_iter().chain(outdoor).collect();
    remaining.sort_by_key(|(index, _)| *index);
    let mut remaining: VecDeque<(usize, &Attraction)> = remaining.into();

    for slot in slots.iter_mut() {
        while slot.len() < per_day {
            let Some(pick) = remaining.pop_front() else { break };
            slot.push(pick);
        }
    }

    slots
        .into_iter()
        .map(|slot| slot.into_iter().map(|(_, a)| a.clone()).collect())
        .collect()
}

fn build_days(
    state: &PlanState,
    allocation: &[Vec<Attraction>],
    rainy: &[bool],
) -> Vec<DaySchedule> {
    let request = &state.request;
    let hotel = state.hotels.first();

    allocation
        .iter()
        .enumerate()
        .map(|(position, picks)| {
            let day_index = position as u32 + 1;
            let mut schedule = Vec::new();

            if day_index == 1 && let Some(route) = &state.route {
                schedule.push(format!(
                    "Travel: {}",
                    route.describe(&request.origin_city, &request.destination_city)
                ));
            }
            if rainy.get(position).copied().unwrap_or(false)
                && let Some(day) = state.weather.as_ref().and_then(|w| w.day(day_index))
            {
                schedule.push(format!(
                    "Note: {} forecast, favor indoor options",
                    day.condition
                ));
            }

            for (slot, attraction) in picks.iter().enumerate() {
                let label = SLOT_LABELS[slot.min(SLOT_LABELS.len() - 1)];
                let mut entry = format!("{label}: {}", attraction.name);
                if let Some(address) = &attraction.address {
                    entry.push_str(&format!(" ({address})"));
                }
                schedule.push(entry);
            }
            if picks.is_empty() {
                schedule.push(format!(
                    "Open day: explore {} at your own pace",
                    request.destination_city
                ));
            }
            if let Some(hotel) = hotel {
                schedule.push(format!("Stay: {}", hotel.name));
            }

            let title = match picks.first() {
                Some(first) => format!("Day {day_index}: {}", first.name),
                None => format!("Day {day_index}: {} at leisure", request.destination_city),
            };

            DaySchedule {
                day_index,
                title,
                schedule,
            }
        })
        .collect()
}

fn build_overview(state: &PlanState) -> String {
    let request = &state.request;
    let mut overview = format!(
        "{} days in {} for {} traveler{}, {} pace: {} attraction candidates",
        request.days,
        request.destination_city,
        request.travelers,
        if request.travelers == 1 { "" } else { "s" },
        match request.pace {
            crate::types::Pace::Relaxed => "relaxed",
            crate::types::Pace::Balanced => "balanced",
            crate::types::Pace::Intense => "intense",
        },
        state.attractions.len(),
    );
    if !state.hotels.is_empty() {
        overview.push_str(&format!(", {} hotel options", state.hotels.len()));
    }
    if let Some(route) = &state.route {
        overview.push_str(&format!(
            ". Getting there: {}",
            route.describe(&request.origin_city, &request.destination_city)
        ));
    }
    let rainy_count = state
        .weather
        .as_ref()
        .map(|w| w.days.iter().filter(|d| d.is_rainy()).count())
        .unwrap_or(0);
    if rainy_count > 0 {
        overview.push_str(&format!(
            ". Rain is forecast on {rainy_count} day{}; outdoor visits are scheduled around it",
            if rainy_count == 1 { "" } else { "s" }
        ));
    }
    overview.push('.');
    overview
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::config::PlannerConfig;
    use crate::tools::{ToolInvoker, ToolRegistry};
    use crate::types::{Hotel, Pace, RouteSummary, TripRequest, WeatherDay, WeatherReport};

    fn attraction(name: &str, tags: &[&str]) -> Attraction {
        Attraction {
            name: name.into(),
            address: None,
            location: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn base_state(days: u32, pace: Pace) -> PlanState {
        PlanState::seed(TripRequest {
            origin_city: "Shanghai".into(),
            destination_city: "Hangzhou".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
            days,
            travelers: 2,
            budget_level: None,
            hotel_level: None,
            preferences: vec![],
            pace,
        })
    }

    fn context() -> NodeContext {
        NodeContext {
            registry: Arc::new(ToolRegistry::new()),
            invoker: ToolInvoker::default(),
            config: PlannerConfig::default(),
            synthesizer: None,
        }
    }

    fn weather_with_rain_on(day: usize, total: usize) -> WeatherReport {
        WeatherReport {
            city: Some("Hangzhou".into()),
            days: (1..=total)
                .map(|i| WeatherDay {
                    date: None,
                    condition: if i == day { "light rain".into() } else { "sunny".into() },
                    high: None,
                    low: None,
                })
                .collect(),
        }
    }

    #[test]
    fn allocation_moves_outdoor_off_rainy_days() {
        let attractions = vec![
            attraction("West Lake", &["outdoor"]),
            attraction("Silk Museum", &["museum"]),
            attraction("Lingyin Temple", &["temple"]),
            attraction("Botanical Garden", &["garden"]),
            attraction("Tea House", &["food"]),
            attraction("Leifeng Pagoda", &["scenic"]),
            attraction("City Gallery", &["art"]),
            attraction("Night Market", &["food"]),
            attraction("Xixi Wetland", &["park"]),
        ];
        let rainy = vec![false, true, false];
        let allocation = allocate_attractions(&attractions, 3, 3, &rainy);

        assert_eq!(allocation.len(), 3);
        for day in &allocation {
            assert_eq!(day.len(), 3);
        }
        // The rainy day took the indoor candidates.
        assert!(allocation[1].iter().all(|a| !a.is_outdoor()));
        // Nothing lost, nothing duplicated.
        let mut names: Vec<&str> = allocation
            .iter()
            .flatten()
            .map(|a| a.name.as_str())
            .collect();
        names.sort_unstable();
        assert_eq!(names.len(), 9);
        names.dedup();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn allocation_fills_rainy_day_from_remaining_when_indoor_short() {
        let attractions = vec![
            attraction("West Lake", &["outdoor"]),
            attraction("Xixi Wetland", &["park"]),
            attraction("Silk Museum", &["museum"]),
        ];
        let rainy = vec![true];
        let allocation = allocate_attractions(&attractions, 1, 3, &rainy);
        assert_eq!(allocation[0].len(), 3);
    }

    #[test]
    fn relaxed_pace_schedules_fewer_entries() {
        let attractions: Vec<Attraction> = (0..9)
            .map(|i| attraction(&format!("Spot {i}"), &["museum"]))
            .collect();
        let allocation = allocate_attractions(&attractions, 3, 2, &[false, false, false]);
        assert!(allocation.iter().all(|day| day.len() == 2));
    }

    #[tokio::test]
    async fn planner_builds_contiguous_days_with_context_entries() {
        let mut state = base_state(3, Pace::Balanced);
        state.attractions = (0..9)
            .map(|i| attraction(&format!("Spot {i}"), &["museum"]))
            .collect();
        state.hotels = vec![Hotel {
            name: "Lakeside Inn".into(),
            address: None,
            level: Some("comfort".into()),
        }];
        state.route = Some(RouteSummary {
            distance: Some("180000".into()),
            duration: Some("7200".into()),
            taxi_cost: None,
        });
        state.weather = Some(weather_with_rain_on(2, 3));

        let outcome = run(&context(), state).await;
        let NodeOutcome::Continue(state) = outcome else {
            panic!("planner should continue");
        };

        check_day_invariants(&state.days, 3).unwrap();
        assert!(state.days[0].schedule[0].starts_with("Travel:"));
        assert!(
            state.days[1]
                .schedule
                .iter()
                .any(|e| e.starts_with("Note:") && e.contains("rain"))
        );
        assert!(
            state
                .days
                .iter()
                .all(|d| d.schedule.iter().any(|e| e == "Stay: Lakeside Inn"))
        );
        assert!(!state.overview.is_empty());
        assert!(state.failures.is_empty());
    }

    #[tokio::test]
    async fn planner_handles_sparse_state() {
        let mut state = base_state(2, Pace::Relaxed);
        state.attractions = vec![attraction("West Lake", &["outdoor"])];

        let outcome = run(&context(), state).await;
        let NodeOutcome::Continue(state) = outcome else {
            panic!("planner should continue");
        };
        check_day_invariants(&state.days, 2).unwrap();
        // The second day ran out of candidates but is not empty.
        assert!(
            state.days[1]
                .schedule
                .iter()
                .any(|e| e.starts_with("Open day:"))
        );
    }

    #[test]
    fn invariant_check_rejects_gaps_and_wrong_counts() {
        let days = vec![
            DaySchedule {
                day_index: 1,
                title: "Day 1".into(),
                schedule: vec![],
            },
            DaySchedule {
                day_index: 3,
                title: "Day 3".into(),
                schedule: vec![],
            },
        ];
        assert!(check_day_invariants(&days, 2).is_err());
        assert!(check_day_invariants(&days[..1], 2).is_err());
    }
}
