//! Request, plan, and domain payload types.

mod failure;
mod payload;
mod plan;
mod request;

pub use failure::{FailureKind, FailureRecord, ToolCallResult};
pub use payload::{Attraction, Hotel, RouteSummary, WeatherDay, WeatherReport};
pub use plan::{DaySchedule, PlanResult, TripPlan};
pub use request::{BudgetLevel, HotelLevel, Pace, TripRequest};
