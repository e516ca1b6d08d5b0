//! Tool invoker: validation, timeout, and retry around one tool call.
//!
//! The invoker never lets an error escape its boundary: every call path
//! ends in a [`ToolCallResult`], either the tool's payload or a classified
//! failure the calling node can record.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{Tool, ToolError};
use crate::types::{FailureKind, ToolCallResult};

/// Retry and timeout policy for a single tool call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts allowed beyond the first.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles per retry.
    pub initial_backoff: Duration,
    /// Backoff ceiling.
    pub max_backoff: Duration,
    /// Per-attempt timeout window.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(1500),
            max_backoff: Duration::from_secs(30),
            attempt_timeout: Duration::from_secs(20),
        }
    }
}

/// Executes one named tool call under a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct ToolInvoker {
    policy: RetryPolicy,
}

impl ToolInvoker {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Validate `arguments` against the tool's input schema, then attempt
    /// the call with per-attempt timeouts and exponential backoff.
    ///
    /// Only transient failures are retried; validation and authorization
    /// failures return immediately without touching the tool. An exceeded
    /// attempt timeout counts as a transient failure.
    pub async fn call(&self, tool: &Arc<dyn Tool>, arguments: serde_json::Value) -> ToolCallResult {
        let name = tool.name().to_string();
        if let Err(message) = validate_input(&tool.input_schema(), &arguments) {
            debug!(tool = %name, %message, "rejected arguments before dispatch");
            return ToolCallResult::failure(FailureKind::InvalidArguments, message);
        }

        let mut attempt: u32 = 0;
        let mut backoff = self.policy.initial_backoff;
        let mut last_error;

        loop {
            let outcome =
                tokio::time::timeout(self.policy.attempt_timeout, tool.execute(arguments.clone()))
                    .await;
            match outcome {
                Ok(Ok(payload)) => {
                    debug!(tool = %name, attempt, "tool call succeeded");
                    return ToolCallResult::success(payload);
                }
                Ok(Err(e)) if !e.is_transient() => {
                    warn!(tool = %name, error = %e, "tool call failed, not retryable");
                    return ToolCallResult::failure(e.kind(), e.to_string());
                }
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => {
                    last_error = ToolError::timeout(self.policy.attempt_timeout.as_millis() as u64)
                        .to_string();
                }
            }

            if attempt >= self.policy.max_retries {
                warn!(tool = %name, attempts = attempt + 1, error = %last_error, "retries exhausted");
                return ToolCallResult::failure(FailureKind::Exhausted, last_error);
            }
            attempt += 1;
            warn!(tool = %name, attempt, error = %last_error, "retrying after transient failure");
            // Symmetrical 10% jitter to prevent thundering herd
            let jitter_factor = 1.0 + (rand::random::<f64>() * 0.2 - 0.1);
            tokio::time::sleep(backoff.mul_f64(jitter_factor)).await;
            backoff = (backoff * 2).min(self.policy.max_backoff);
        }
    }
}

/// Structural check of arguments against a JSON schema: the payload must be
/// an object when the schema says so, required keys must be present, and
/// declared primitive types must match. Unknown schema constructs pass.
fn validate_input(schema: &serde_json::Value, arguments: &serde_json::Value) -> Result<(), String> {
    let Some(schema) = schema.as_object() else {
        return Ok(());
    };
    if schema.get("type").and_then(|t| t.as_str()) != Some("object") {
        return Ok(());
    }
    let Some(arguments) = arguments.as_object() else {
        return Err(format!("expected object arguments, got {}", type_name(arguments)));
    };

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for key in required.iter().filter_map(|k| k.as_str()) {
            if !arguments.contains_key(key) {
                return Err(format!("missing required argument: {key}"));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        for (key, value) in arguments {
            let Some(declared) = properties.get(key).and_then(|p| p.get("type")) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let matches = match declared.as_str() {
                Some("string") => value.is_string(),
                Some("number") => value.is_number(),
                Some("integer") => value.is_i64() || value.is_u64(),
                Some("boolean") => value.is_boolean(),
                Some("array") => value.is_array(),
                Some("object") => value.is_object(),
                _ => true,
            };
            if !matches {
                return Err(format!(
                    "argument {key} should be {}, got {}",
                    declared.as_str().unwrap_or("unknown"),
                    type_name(value)
                ));
            }
        }
    }

    Ok(())
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
