//! AMap map-provider adapter.
//!
//! Optional convenience layer: the orchestrator only requires that *some*
//! registry serves the tool names in [`crate::tools::names`]; this module
//! provides one backed by the AMap REST API.

mod client;
mod tools;

pub use client::AmapClient;
pub use tools::{RouteTool, SearchPoiTool, WeatherTool, amap_registry};
