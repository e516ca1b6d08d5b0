//! Hotel selection node.
//!
//! Searches lodging filtered by the requested tier. Hotels are a
//! nice-to-have: a failed search degrades the plan and the itinerary
//! simply omits lodging suggestions.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::tools::names;
use crate::types::{Hotel, HotelLevel, ToolCallResult};
use crate::workflow::node::{NodeContext, NodeOutcome, NodeRole};
use crate::workflow::state::PlanState;

#[derive(Debug, Deserialize)]
struct HotelPayload {
    #[serde(default)]
    pois: Vec<Hotel>,
}

pub(crate) async fn run(ctx: &NodeContext, mut state: PlanState) -> NodeOutcome {
    let node = NodeRole::Hotel.name();
    let request = &state.request;
    let level = request.hotel_level.unwrap_or(HotelLevel::Comfort);
    info!(city = %request.destination_city, level = level.keyword(), "searching hotels");

    let result = ctx
        .invoke(
            names::SEARCH_POI,
            json!({
                "city": request.destination_city,
                "keywords": format!("{} hotel", level.keyword()),
                "types": "hotel",
                "max_results": ctx.config.max_results,
            }),
        )
        .await;

    match result {
        ToolCallResult::Success(payload) => match serde_json::from_value::<HotelPayload>(payload) {
            Ok(parsed) => {
                state.hotels = parsed
                    .pois
                    .into_iter()
                    .filter(|h| !h.name.trim().is_empty())
                    .map(|mut h| {
                        h.level.get_or_insert_with(|| level.keyword().to_string());
                        h
                    })
                    .collect();
                info!(candidates = state.hotels.len(), "hotel search done");
                NodeOutcome::Continue(state)
            }
            Err(e) => {
                let reason = format!("unreadable hotel payload: {e}");
                state.record_failure(
                    node,
                    Some(names::SEARCH_POI),
                    crate::types::FailureKind::InvariantViolation,
                    reason.clone(),
                );
                NodeOutcome::SkipWithWarning(state, reason)
            }
        },
        ToolCallResult::Failure { kind, message } => {
            let reason = format!("hotel search unavailable: {message}");
            state.record_failure(node, Some(names::SEARCH_POI), kind, message);
            NodeOutcome::SkipWithWarning(state, reason)
        }
    }
}
