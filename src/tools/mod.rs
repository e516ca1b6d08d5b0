//! Tool abstraction: registry, invoker, and the trait surface adapters
//! implement.

mod error;
mod invoker;
mod registry;
mod traits;

pub use error::{RegistryError, ToolError};
pub use invoker::{RetryPolicy, ToolInvoker};
pub use registry::ToolRegistry;
pub use traits::{SchemaTool, Tool, ToolDescriptor};

/// Tool names the workflow's fixed node sequence resolves at startup.
pub mod names {
    /// Keyword POI search in a city; used by the attraction and hotel nodes.
    pub const SEARCH_POI: &str = "map_search_poi";
    /// Forecast for a city across a date range.
    pub const WEATHER: &str = "map_weather";
    /// Driving route summary between two cities.
    pub const ROUTE: &str = "map_route";
}
