//! Weather lookup node.
//!
//! Fetches the destination forecast across the trip date range. Weather is
//! advisory context for the planner; losing it degrades the plan rather
//! than failing the run.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::tools::names;
use crate::types::{ToolCallResult, WeatherReport};
use crate::workflow::node::{NodeContext, NodeOutcome, NodeRole};
use crate::workflow::state::PlanState;

#[derive(Debug, Deserialize)]
struct WeatherPayload {
    weather: WeatherReport,
}

pub(crate) async fn run(ctx: &NodeContext, mut state: PlanState) -> NodeOutcome {
    let node = NodeRole::Weather.name();
    let request = &state.request;
    info!(city = %request.destination_city, days = request.days, "fetching forecast");

    let result = ctx
        .invoke(
            names::WEATHER,
            json!({
                "city": request.destination_city,
                "days": request.days,
            }),
        )
        .await;

    match result {
        ToolCallResult::Success(payload) => match serde_json::from_value::<WeatherPayload>(payload)
        {
            Ok(parsed) => {
                info!(forecast_days = parsed.weather.days.len(), "forecast attached");
                state.weather = Some(parsed.weather);
                NodeOutcome::Continue(state)
            }
            Err(e) => {
                let reason = format!("unreadable weather payload: {e}");
                state.record_failure(
                    node,
                    Some(names::WEATHER),
                    crate::types::FailureKind::InvariantViolation,
                    reason.clone(),
                );
                NodeOutcome::SkipWithWarning(state, reason)
            }
        },
        ToolCallResult::Failure { kind, message } => {
            let reason = format!("forecast unavailable: {message}");
            state.record_failure(node, Some(names::WEATHER), kind, message);
            NodeOutcome::SkipWithWarning(state, reason)
        }
    }
}
