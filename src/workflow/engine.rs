//! Workflow engine: the state machine over the fixed node sequence.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};

use super::node::{NodeContext, NodeOutcome, NodeRole};
use super::nodes;
use super::state::PlanState;
use super::synthesis::Synthesizer;
use crate::config::PlannerConfig;
use crate::tools::{RegistryError, ToolInvoker, ToolRegistry};
use crate::types::{FailureRecord, PlanResult, TripPlan};

/// A failed planning run. Every variant that can occur mid-run carries the
/// diagnostic trail accumulated before the failure.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A node classified its data loss as fatal and stopped the run.
    #[error("planning aborted in {node} node: {reason}")]
    Aborted {
        node: &'static str,
        reason: String,
        failures: Vec<FailureRecord>,
    },

    /// The per-run wall-clock budget was exceeded.
    #[error("planning exceeded its {:.0}s budget", budget.as_secs_f64())]
    Timeout {
        budget: Duration,
        failures: Vec<FailureRecord>,
    },

    /// The aggregated plan failed its structural checks. Never retried,
    /// never silently repaired.
    #[error("plan invariant violated: {0}")]
    Invariant(String),

    /// Registry misconfiguration detected at engine construction.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The request failed the engine's convenience validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl PlanError {
    /// Diagnostic records accumulated before the failure, if any.
    pub fn failures(&self) -> &[FailureRecord] {
        match self {
            Self::Aborted { failures, .. } | Self::Timeout { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// Drives one planning run through the fixed node sequence
/// `[attraction, weather, hotel, route, planner]`.
///
/// The engine owns nothing mutable between runs: each run gets its own
/// [`PlanState`], and the registry is shared read-only, so any number of
/// runs may proceed concurrently on one engine.
pub struct WorkflowEngine {
    ctx: NodeContext,
    budget: Duration,
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

impl WorkflowEngine {
    /// Build an engine over an initialized registry.
    ///
    /// Fails with [`RegistryError::UnknownTool`] if any tool the fixed node
    /// sequence requires is missing; registry misconfiguration surfaces
    /// here, never in the middle of a run.
    pub fn new(registry: Arc<ToolRegistry>, config: PlannerConfig) -> Result<Self, PlanError> {
        for role in NodeRole::SEQUENCE {
            for tool in role.required_tools() {
                registry.resolve(tool)?;
            }
        }
        let budget = config.run_budget;
        let invoker = ToolInvoker::new(config.retry_policy());
        Ok(Self {
            ctx: NodeContext {
                registry,
                invoker,
                config,
                synthesizer: None,
            },
            budget,
        })
    }

    /// Attach a generative synthesizer for the planner node to consult.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.ctx.synthesizer = Some(synthesizer);
        self
    }

    /// Run the pipeline for one request.
    ///
    /// Returns a best-effort plan with a (possibly empty) warnings list, or
    /// a structured failure carrying the partial diagnostic trail. Never a
    /// silent empty result.
    pub async fn run(&self, request: crate::types::TripRequest) -> Result<PlanResult, PlanError> {
        request.validate().map_err(PlanError::InvalidRequest)?;

        let deadline = Instant::now() + self.budget;
        let mut state = PlanState::seed(request);
        let run_id = state.run_id;
        info!(%run_id, destination = %state.request.destination_city, days = state.request.days, "planning run started");

        for role in NodeRole::SEQUENCE {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                warn!(%run_id, node = role.name(), "run budget exhausted at node transition");
                return Err(PlanError::Timeout {
                    budget: self.budget,
                    failures: state.failures,
                });
            };

            // The failure log survives a timed-out node; the rest of the
            // in-flight update is intentionally discarded with the future.
            let failures_so_far = state.failures.clone();
            let outcome =
                match tokio::time::timeout(remaining, nodes::run(role, &self.ctx, state)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(%run_id, node = role.name(), "run budget exhausted mid-node");
                        return Err(PlanError::Timeout {
                            budget: self.budget,
                            failures: failures_so_far,
                        });
                    }
                };

            match outcome {
                NodeOutcome::Continue(updated) => state = updated,
                NodeOutcome::SkipWithWarning(updated, reason) => {
                    warn!(%run_id, node = role.name(), %reason, "node degraded");
                    state = updated;
                }
                NodeOutcome::Abort { reason, failures } => {
                    warn!(%run_id, node = role.name(), %reason, "node aborted the run");
                    return Err(PlanError::Aborted {
                        node: role.name(),
                        reason,
                        failures,
                    });
                }
            }
        }

        nodes::check_day_invariants(&state.days, state.request.days)
            .map_err(PlanError::Invariant)?;

        info!(%run_id, warnings = state.failures.len(), "planning run finished");
        Ok(PlanResult {
            run_id,
            plan: TripPlan {
                overview: state.overview,
                days: state.days,
                attractions: state.attractions,
                hotels: state.hotels,
                weather: state.weather,
                route: state.route,
            },
            request: state.request,
            warnings: state.failures,
        })
    }
}
