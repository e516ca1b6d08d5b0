//! Attraction discovery node.
//!
//! Issues one POI search per preference tag, all concurrently, and merges
//! the successful results. Individual search failures degrade the result;
//! zero usable candidates across every search aborts the run, since an
//! itinerary without a single attraction is meaningless.

use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::tools::names;
use crate::types::{Attraction, ToolCallResult};
use crate::workflow::node::{NodeContext, NodeOutcome, NodeRole};
use crate::workflow::state::PlanState;

#[derive(Debug, Deserialize)]
struct PoiPayload {
    #[serde(default)]
    pois: Vec<Attraction>,
}

pub(crate) async fn run(ctx: &NodeContext, mut state: PlanState) -> NodeOutcome {
    let node = NodeRole::Attraction.name();
    let request = &state.request;
    let interests = if request.preferences.is_empty() {
        ctx.config.default_interests.clone()
    } else {
        request.preferences.clone()
    };
    info!(
        city = %request.destination_city,
        searches = interests.len(),
        "discovering attractions"
    );

    let calls = interests.iter().map(|interest| {
        ctx.invoke(
            names::SEARCH_POI,
            json!({
                "city": request.destination_city,
                "keywords": interest,
                "max_results": ctx.config.max_results,
            }),
        )
    });
    let results = join_all(calls).await;

    for (interest, result) in interests.iter().zip(results) {
        match result {
            ToolCallResult::Success(payload) => {
                let parsed: PoiPayload = match serde_json::from_value(payload) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        state.record_failure(
                            node,
                            Some(names::SEARCH_POI),
                            crate::types::FailureKind::InvariantViolation,
                            format!("unreadable POI payload for '{interest}': {e}"),
                        );
                        continue;
                    }
                };
                debug!(interest = %interest, count = parsed.pois.len(), "search returned");
                for poi in parsed.pois {
                    if poi.name.trim().is_empty() {
                        continue;
                    }
                    if !state.attractions.iter().any(|a| a.name == poi.name) {
                        state.attractions.push(poi);
                    }
                }
            }
            ToolCallResult::Failure { kind, message } => {
                state.record_failure(
                    node,
                    Some(names::SEARCH_POI),
                    kind,
                    format!("search for '{interest}' failed: {message}"),
                );
            }
        }
    }

    if state.attractions.is_empty() {
        return NodeOutcome::Abort {
            reason: format!(
                "no usable attractions found for {}",
                state.request.destination_city
            ),
            failures: state.failures,
        };
    }

    info!(candidates = state.attractions.len(), "attraction discovery done");
    NodeOutcome::Continue(state)
}
