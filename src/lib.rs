//! # trip-agent
//!
//! Multi-agent trip planning orchestrator. A fixed pipeline of role-specific
//! agent nodes (attraction discovery, weather lookup, hotel selection, route
//! summarization, plan aggregation) threads a shared plan state from node to
//! node, calling external tools through a dynamically-bound registry and
//! merging partial results (including partial failures) into one
//! structured, day-by-day itinerary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use trip_agent::amap::{AmapClient, amap_registry};
//! use trip_agent::config::PlannerConfig;
//! use trip_agent::types::{Pace, TripRequest};
//! use trip_agent::workflow::WorkflowEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = amap_registry(AmapClient::new(std::env::var("AMAP_API_KEY")?))?;
//!     let engine = WorkflowEngine::new(Arc::new(registry), PlannerConfig::from_env())?;
//!
//!     let result = engine
//!         .run(TripRequest {
//!             origin_city: "Shanghai".into(),
//!             destination_city: "Hangzhou".into(),
//!             start_date: "2026-04-10".parse()?,
//!             days: 3,
//!             travelers: 2,
//!             budget_level: None,
//!             hotel_level: None,
//!             preferences: vec!["museums".into(), "food".into()],
//!             pace: Pace::Balanced,
//!         })
//!         .await?;
//!
//!     println!("{}", result.plan.overview);
//!     for warning in &result.warnings {
//!         eprintln!("warning: {} ({:?})", warning.message, warning.kind);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! Tool failures are absorbed and classified by the invoker; each node
//! decides between degrading (recording a warning and continuing with
//! partial data) and aborting (only when the lost data makes the plan
//! meaningless). The caller always receives either a best-effort plan with
//! a visible warnings list or a structured failure with its diagnostic
//! trail, never a silent empty result.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod amap;
pub mod config;
pub mod tools;
pub mod types;
pub mod workflow;

// Re-exports for convenience
pub use config::{PaceProfile, PlannerConfig};
pub use tools::{
    RegistryError, RetryPolicy, SchemaTool, Tool, ToolDescriptor, ToolError, ToolInvoker,
    ToolRegistry,
};
pub use types::{
    Attraction, BudgetLevel, DaySchedule, FailureKind, FailureRecord, Hotel, HotelLevel, Pace,
    PlanResult, RouteSummary, ToolCallResult, TripPlan, TripRequest, WeatherDay, WeatherReport,
};
pub use workflow::{
    NodeOutcome, NodeRole, PlanError, PlanState, SynthesisDraft, Synthesizer, WorkflowEngine,
};
