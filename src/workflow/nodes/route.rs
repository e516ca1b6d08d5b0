//! Route summarization node.
//!
//! Produces the door-to-door summary between origin and destination. Like
//! weather, the route is advisory: a failure degrades the plan.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::tools::names;
use crate::types::{RouteSummary, ToolCallResult};
use crate::workflow::node::{NodeContext, NodeOutcome, NodeRole};
use crate::workflow::state::PlanState;

#[derive(Debug, Deserialize)]
struct RoutePayload {
    route: RouteSummary,
}

pub(crate) async fn run(ctx: &NodeContext, mut state: PlanState) -> NodeOutcome {
    let node = NodeRole::Route.name();
    let request = &state.request;
    info!(
        origin = %request.origin_city,
        destination = %request.destination_city,
        "summarizing route"
    );

    let result = ctx
        .invoke(
            names::ROUTE,
            json!({
                "origin_city": request.origin_city,
                "destination_city": request.destination_city,
            }),
        )
        .await;

    match result {
        ToolCallResult::Success(payload) => match serde_json::from_value::<RoutePayload>(payload) {
            Ok(parsed) => {
                state.route = Some(parsed.route);
                NodeOutcome::Continue(state)
            }
            Err(e) => {
                let reason = format!("unreadable route payload: {e}");
                state.record_failure(
                    node,
                    Some(names::ROUTE),
                    crate::types::FailureKind::InvariantViolation,
                    reason.clone(),
                );
                NodeOutcome::SkipWithWarning(state, reason)
            }
        },
        ToolCallResult::Failure { kind, message } => {
            let reason = format!("route summary unavailable: {message}");
            state.record_failure(node, Some(names::ROUTE), kind, message);
            NodeOutcome::SkipWithWarning(state, reason)
        }
    }
}
