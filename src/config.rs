//! Planner configuration.
//!
//! Every policy knob the orchestrator consults lives here: retry/backoff
//! parameters, timeout windows, the per-run budget, and the pace profile
//! that drives attraction allocation. Defaults match the reference
//! deployment; `from_env` overrides them from `TRIP_AGENT_*` variables.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::tools::RetryPolicy;
use crate::types::Pace;

/// Entries-per-day targets keyed by requested pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaceProfile {
    pub relaxed: usize,
    pub balanced: usize,
    pub intense: usize,
}

impl Default for PaceProfile {
    fn default() -> Self {
        Self {
            relaxed: 2,
            balanced: 3,
            intense: 4,
        }
    }
}

impl PaceProfile {
    pub fn entries_per_day(&self, pace: Pace) -> usize {
        match pace {
            Pace::Relaxed => self.relaxed,
            Pace::Balanced => self.balanced,
            Pace::Intense => self.intense,
        }
    }
}

/// Policy configuration for a [`crate::workflow::WorkflowEngine`].
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Per-attempt timeout for external tool calls.
    pub tool_timeout: Duration,
    /// Timeout for the optional generative-synthesis call.
    pub synthesis_timeout: Duration,
    /// Tool-call attempts allowed beyond the first.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles per retry.
    pub initial_backoff: Duration,
    /// Backoff ceiling.
    pub max_backoff: Duration,
    /// Wall-clock budget for one whole planning run.
    pub run_budget: Duration,
    /// Maximum candidates requested per POI search.
    pub max_results: u32,
    /// Interest tags used when a request carries no preferences.
    pub default_interests: Vec<String>,
    /// Attraction allocation targets per pace.
    pub pace_profile: PaceProfile,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tool_timeout: Duration::from_secs(20),
            synthesis_timeout: Duration::from_secs(60),
            max_retries: 2,
            initial_backoff: Duration::from_millis(1500),
            max_backoff: Duration::from_secs(30),
            run_budget: Duration::from_secs(120),
            max_results: 10,
            default_interests: vec!["landmarks".into(), "culture".into(), "food".into()],
            pace_profile: PaceProfile::default(),
        }
    }
}

impl PlannerConfig {
    /// Build a config from `TRIP_AGENT_*` environment variables, falling
    /// back to defaults for anything unset or unparsable.
    ///
    /// Recognized variables: `TRIP_AGENT_TOOL_TIMEOUT_SECS`,
    /// `TRIP_AGENT_SYNTHESIS_TIMEOUT_SECS`, `TRIP_AGENT_MAX_RETRIES`,
    /// `TRIP_AGENT_INITIAL_BACKOFF_MS`, `TRIP_AGENT_MAX_BACKOFF_SECS`,
    /// `TRIP_AGENT_RUN_BUDGET_SECS`, `TRIP_AGENT_MAX_RESULTS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tool_timeout: env_duration_secs("TRIP_AGENT_TOOL_TIMEOUT_SECS", defaults.tool_timeout),
            synthesis_timeout: env_duration_secs(
                "TRIP_AGENT_SYNTHESIS_TIMEOUT_SECS",
                defaults.synthesis_timeout,
            ),
            max_retries: env_parse("TRIP_AGENT_MAX_RETRIES", defaults.max_retries),
            initial_backoff: env_duration_millis(
                "TRIP_AGENT_INITIAL_BACKOFF_MS",
                defaults.initial_backoff,
            ),
            max_backoff: env_duration_secs("TRIP_AGENT_MAX_BACKOFF_SECS", defaults.max_backoff),
            run_budget: env_duration_secs("TRIP_AGENT_RUN_BUDGET_SECS", defaults.run_budget),
            max_results: env_parse("TRIP_AGENT_MAX_RESULTS", defaults.max_results),
            ..defaults
        }
    }

    /// Retry policy applied to every external tool call.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: self.initial_backoff,
            max_backoff: self.max_backoff,
            attempt_timeout: self.tool_timeout,
        }
    }

    pub fn entries_per_day(&self, pace: Pace) -> usize {
        self.pace_profile.entries_per_day(pace)
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "ignoring unparsable environment override");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_duration_secs(key: &str, default: Duration) -> Duration {
    Duration::from_secs(env_parse(key, default.as_secs()))
}

fn env_duration_millis(key: &str, default: Duration) -> Duration {
    Duration::from_millis(env_parse(key, default.as_millis() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.tool_timeout, Duration::from_secs(20));
        assert_eq!(config.run_budget, Duration::from_secs(120));
        assert_eq!(config.entries_per_day(Pace::Relaxed), 2);
        assert_eq!(config.entries_per_day(Pace::Balanced), 3);
        assert_eq!(config.entries_per_day(Pace::Intense), 4);
    }

    #[test]
    fn env_parse_keeps_default_on_garbage() {
        let key = "TRIP_AGENT_TEST_ENV_PARSE";
        unsafe { std::env::set_var(key, "not a number") };
        assert_eq!(env_parse(key, 7u32), 7);
        unsafe { std::env::set_var(key, "42") };
        assert_eq!(env_parse(key, 7u32), 42);
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    fn retry_policy_mirrors_config() {
        let config = PlannerConfig {
            max_retries: 5,
            tool_timeout: Duration::from_secs(7),
            ..PlannerConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(7));
    }
}
