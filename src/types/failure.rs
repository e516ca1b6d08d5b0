//! Failure classification and tool-call outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of everything that can go wrong during a planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Arguments rejected before dispatch; never retried.
    InvalidArguments,
    /// Network / timeout / rate-limit class failure; eligible for retry.
    Transient,
    /// Retry budget spent without a success.
    Exhausted,
    /// Upstream rejected the credentials; never retried.
    Unauthorized,
    /// Lookup of an unregistered tool name.
    UnknownTool,
    /// Second registration under an existing tool name.
    DuplicateTool,
    /// A payload or the aggregated plan failed its structural checks.
    InvariantViolation,
    /// Per-run wall-clock budget exceeded.
    Timeout,
}

/// A non-fatal diagnostic appended to the plan state during a run.
///
/// Records are append-only and surfaced to the caller either as warnings on
/// a best-effort plan or as the diagnostic trail of a failed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Node that observed the failure.
    pub node: String,
    /// Tool involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Failure classification.
    pub kind: FailureKind,
    /// Human-readable detail.
    pub message: String,
    /// When the failure was recorded.
    pub at: DateTime<Utc>,
}

impl FailureRecord {
    pub fn new(
        node: impl Into<String>,
        tool: Option<&str>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            node: node.into(),
            tool: tool.map(str::to_string),
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Tagged outcome of one tool invocation. Never both success and failure.
#[derive(Debug, Clone)]
pub enum ToolCallResult {
    /// The tool produced a payload.
    Success(serde_json::Value),
    /// The invoker absorbed and classified a failure.
    Failure { kind: FailureKind, message: String },
}

impl ToolCallResult {
    pub fn success(payload: serde_json::Value) -> Self {
        Self::Success(payload)
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kind_serializes_snake_case() {
        let kind = serde_json::to_value(FailureKind::InvalidArguments).unwrap();
        assert_eq!(kind, serde_json::json!("invalid_arguments"));
    }

    #[test]
    fn tool_call_result_tags() {
        assert!(!ToolCallResult::success(serde_json::json!({})).is_failure());
        assert!(ToolCallResult::failure(FailureKind::Exhausted, "gave up").is_failure());
    }
}
