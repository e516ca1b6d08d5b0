//! AMap-backed tool implementations.
//!
//! Each tool translates raw provider responses into the payload shapes the
//! workflow nodes expect (see [`crate::types`]), keeping the nodes
//! provider-agnostic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::AmapClient;
use crate::tools::{RegistryError, SchemaTool, ToolError, ToolRegistry, names};

/// Provider category segments that mark a POI as weather-sensitive.
const OUTDOOR_CATEGORY_MARKERS: &[&str] = &[
    "公园", "风景", "广场", "植物园", "动物园", "park", "scenic", "garden", "outdoor",
];

/// Build a registry with every AMap tool registered under the names the
/// workflow resolves.
pub fn amap_registry(client: AmapClient) -> Result<ToolRegistry, RegistryError> {
    let client = Arc::new(client);
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchPoiTool::new(client.clone())))?;
    registry.register(Arc::new(WeatherTool::new(client.clone())))?;
    registry.register(Arc::new(RouteTool::new(client)))?;
    Ok(registry)
}

fn default_max_results() -> u32 {
    10
}

/// Input for the POI search tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchPoiInput {
    /// City to search within.
    pub city: String,
    /// Search keywords, e.g. an interest tag or "comfort hotel".
    pub keywords: String,
    /// Optional provider category filter, e.g. "hotel".
    #[serde(default)]
    pub types: Option<String>,
    /// Maximum candidates to return.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// Keyword POI search in a city.
pub struct SearchPoiTool {
    client: Arc<AmapClient>,
}

impl SearchPoiTool {
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SchemaTool for SearchPoiTool {
    type Input = SearchPoiInput;
    const NAME: &'static str = names::SEARCH_POI;
    const DESCRIPTION: &'static str =
        "Search points of interest by keywords in a city. Returns candidate names, \
         addresses, coordinates, and category tags.";

    async fn handle(&self, input: SearchPoiInput) -> Result<Value, ToolError> {
        let raw = self
            .client
            .search_poi(
                &input.keywords,
                &input.city,
                input.types.as_deref(),
                input.max_results,
            )
            .await?;

        let pois: Vec<Value> = raw
            .get("pois")
            .and_then(Value::as_array)
            .map(|pois| pois.iter().map(map_poi).collect())
            .unwrap_or_default();

        Ok(json!({
            "count": pois.len(),
            "pois": pois,
        }))
    }

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "count": {"type": "integer"},
                "pois": {"type": "array", "items": {"type": "object"}}
            },
            "required": ["pois"]
        })
    }
}

fn map_poi(poi: &Value) -> Value {
    let category = poi.get("type").and_then(Value::as_str).unwrap_or_default();
    let mut tags: Vec<String> = category
        .split([';', '|'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let lowered = category.to_ascii_lowercase();
    if OUTDOOR_CATEGORY_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        tags.push("outdoor".to_string());
    }

    json!({
        "name": poi.get("name").and_then(Value::as_str).unwrap_or_default(),
        "address": poi.get("address").and_then(Value::as_str),
        "location": poi.get("location").and_then(Value::as_str),
        "tags": tags,
    })
}

/// Input for the weather tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WeatherInput {
    /// City to fetch the forecast for.
    pub city: String,
    /// Trip length; the forecast is truncated to this many days.
    #[serde(default)]
    pub days: Option<u32>,
}

/// Forecast lookup for a city.
pub struct WeatherTool {
    client: Arc<AmapClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SchemaTool for WeatherTool {
    type Input = WeatherInput;
    const NAME: &'static str = names::WEATHER;
    const DESCRIPTION: &'static str =
        "Get the multi-day weather forecast for a city, one entry per day.";

    async fn handle(&self, input: WeatherInput) -> Result<Value, ToolError> {
        let raw = self.client.weather(&input.city, "all").await?;

        let forecast = raw
            .get("forecasts")
            .and_then(Value::as_array)
            .and_then(|f| f.first());
        let mut days: Vec<Value> = forecast
            .and_then(|f| f.get("casts"))
            .and_then(Value::as_array)
            .map(|casts| casts.iter().map(map_cast).collect())
            .unwrap_or_default();

        // Realtime-only responses still yield a single usable day.
        if days.is_empty()
            && let Some(live) = raw
                .get("lives")
                .and_then(Value::as_array)
                .and_then(|l| l.first())
        {
            days.push(json!({
                "date": Value::Null,
                "condition": live.get("weather").and_then(Value::as_str).unwrap_or_default(),
                "high": live.get("temperature").and_then(Value::as_str),
                "low": Value::Null,
            }));
        }

        if let Some(limit) = input.days {
            days.truncate(limit as usize);
        }

        let city = forecast
            .and_then(|f| f.get("city"))
            .and_then(Value::as_str)
            .unwrap_or(&input.city);

        Ok(json!({
            "weather": {
                "city": city,
                "days": days,
            }
        }))
    }

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "weather": {"type": "object"}
            },
            "required": ["weather"]
        })
    }
}

fn map_cast(cast: &Value) -> Value {
    let date = cast
        .get("date")
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
    json!({
        "date": date,
        "condition": cast.get("dayweather").and_then(Value::as_str).unwrap_or_default(),
        "high": cast.get("daytemp").and_then(Value::as_str),
        "low": cast.get("nighttemp").and_then(Value::as_str),
    })
}

/// Input for the route tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RouteInput {
    pub origin_city: String,
    pub destination_city: String,
}

/// Driving route summary between two cities: geocode both ends, then fetch
/// the first driving path.
pub struct RouteTool {
    client: Arc<AmapClient>,
}

impl RouteTool {
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }

    async fn locate(&self, city: &str) -> Result<String, ToolError> {
        let raw = self.client.geocode(city).await?;
        raw.get("geocodes")
            .and_then(Value::as_array)
            .and_then(|g| g.first())
            .and_then(|g| g.get("location"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ToolError::failed(format!("geocode returned no location for {city}")))
    }
}

#[async_trait]
impl SchemaTool for RouteTool {
    type Input = RouteInput;
    const NAME: &'static str = names::ROUTE;
    const DESCRIPTION: &'static str =
        "Summarize the driving route between two cities: distance, duration, taxi cost.";

    async fn handle(&self, input: RouteInput) -> Result<Value, ToolError> {
        let origin = self.locate(&input.origin_city).await?;
        let destination = self.locate(&input.destination_city).await?;
        let raw = self.client.driving_route(&origin, &destination).await?;

        let route = raw.get("route");
        let path = route
            .and_then(|r| r.get("paths"))
            .and_then(Value::as_array)
            .and_then(|p| p.first());

        Ok(json!({
            "route": {
                "distance": path.and_then(|p| p.get("distance")).and_then(Value::as_str),
                "duration": path.and_then(|p| p.get("duration")).and_then(Value::as_str),
                "taxi_cost": route.and_then(|r| r.get("taxi_cost")).and_then(Value::as_str),
            }
        }))
    }

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "route": {"type": "object"}
            },
            "required": ["route"]
        })
    }
}
