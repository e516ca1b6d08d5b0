//! Workflow orchestration: engine, node contracts, per-run state, and the
//! optional synthesis seam.

mod engine;
mod node;
mod nodes;
mod state;
pub mod synthesis;

pub use engine::{PlanError, WorkflowEngine};
pub use node::{NodeOutcome, NodeRole};
pub use state::PlanState;
pub use synthesis::{DayDraft, SynthesisDraft, Synthesizer};
