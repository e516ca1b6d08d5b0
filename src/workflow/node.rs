//! Node roles, outcomes, and the shared per-run context.

use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::tools::{ToolInvoker, ToolRegistry, names};
use crate::types::{FailureRecord, ToolCallResult};
use crate::workflow::PlanState;
use crate::workflow::synthesis::Synthesizer;

/// The closed set of pipeline roles, in their fixed execution order.
///
/// Dispatch happens through a `match` table in the engine; roles are never
/// registered dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Attraction,
    Weather,
    Hotel,
    Route,
    Planner,
}

impl NodeRole {
    /// The fixed dependency chain. The planner runs last because it
    /// consumes every prior node's output.
    pub const SEQUENCE: [NodeRole; 5] = [
        NodeRole::Attraction,
        NodeRole::Weather,
        NodeRole::Hotel,
        NodeRole::Route,
        NodeRole::Planner,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeRole::Attraction => "attraction",
            NodeRole::Weather => "weather",
            NodeRole::Hotel => "hotel",
            NodeRole::Route => "route",
            NodeRole::Planner => "planner",
        }
    }

    /// Tools the role resolves during a run. Checked at engine construction
    /// so an unknown tool is a startup error, never a mid-run one.
    pub(crate) fn required_tools(self) -> &'static [&'static str] {
        match self {
            NodeRole::Attraction | NodeRole::Hotel => &[names::SEARCH_POI],
            NodeRole::Weather => &[names::WEATHER],
            NodeRole::Route => &[names::ROUTE],
            // The planner synthesizes from state only.
            NodeRole::Planner => &[],
        }
    }
}

/// What a node run decided about the rest of the pipeline.
#[derive(Debug)]
pub enum NodeOutcome {
    /// Proceed to the next node with the updated state.
    Continue(PlanState),
    /// Proceed, but the node degraded; the reason is logged by the engine.
    SkipWithWarning(PlanState, String),
    /// Stop the run. Carries the failure log because the state does not
    /// survive an abort.
    Abort {
        reason: String,
        failures: Vec<FailureRecord>,
    },
}

/// Read-only collaborators shared by every node in a run.
pub(crate) struct NodeContext {
    pub registry: Arc<ToolRegistry>,
    pub invoker: ToolInvoker,
    pub config: PlannerConfig,
    pub synthesizer: Option<Arc<dyn Synthesizer>>,
}

impl NodeContext {
    /// Resolve a tool by name and invoke it. Registry misses are absorbed
    /// into the result so node code has a single failure path to record.
    pub async fn invoke(&self, name: &str, arguments: serde_json::Value) -> ToolCallResult {
        match self.registry.resolve(name) {
            Ok(tool) => self.invoker.call(tool, arguments).await,
            Err(e) => ToolCallResult::failure(e.kind(), e.to_string()),
        }
    }
}
