//! Role-specific node implementations.
//!
//! Each node is a free async function over the shared [`NodeContext`] and
//! the owned [`PlanState`]; the engine dispatches through the fixed table
//! below. Nodes degrade gracefully on tool failure (they record what went
//! wrong and keep whatever partial data they have) and abort only when the
//! missing data would make the plan meaningless.

mod attraction;
mod hotel;
mod planner;
mod route;
mod weather;

pub(crate) use planner::check_day_invariants;

use super::node::{NodeContext, NodeOutcome, NodeRole};
use super::state::PlanState;

/// Fixed dispatch table over the closed role set.
pub(crate) async fn run(role: NodeRole, ctx: &NodeContext, state: PlanState) -> NodeOutcome {
    match role {
        NodeRole::Attraction => attraction::run(ctx, state).await,
        NodeRole::Weather => weather::run(ctx, state).await,
        NodeRole::Hotel => hotel::run(ctx, state).await,
        NodeRole::Route => route::run(ctx, state).await,
        NodeRole::Planner => planner::run(ctx, state).await,
    }
}
