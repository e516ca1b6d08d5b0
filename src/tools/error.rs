//! Tool and registry error types.

use std::time::Duration;

use thiserror::Error;

use crate::types::FailureKind;

/// Errors a tool implementation may surface to the invoker.
///
/// The invoker retries only [`ToolError::is_transient`] errors; validation
/// and authorization failures are returned to the node immediately.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// Network connectivity failed.
    #[error("network error: {0}")]
    Network(String),

    /// The attempt exceeded its timeout window.
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Upstream asked us to slow down.
    #[error("rate limited{}", match retry_after {
        Some(d) => format!(", retry in {:.0}s", d.as_secs_f64()),
        None => String::new(),
    })]
    RateLimited { retry_after: Option<Duration> },

    /// Input failed deserialization or schema checks.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Upstream rejected the credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The call reached the service but the service reported an error.
    #[error("execution failed: {0}")]
    Failed(String),
}

impl ToolError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Service-reported failures count as transient: the unreliable upstreams
    /// this crate fronts routinely recover between attempts.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout { .. } | Self::RateLimited { .. } | Self::Failed(_)
        )
    }

    /// Classification used when the failure is recorded without retrying.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput(_) => FailureKind::InvalidArguments,
            Self::Unauthorized(_) => FailureKind::Unauthorized,
            _ => FailureKind::Transient,
        }
    }
}

/// Registry misconfiguration. Fatal at startup, never raised mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate tool: {name}")]
    DuplicateTool { name: String },

    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
}

impl RegistryError {
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateTool { name: name.into() }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::DuplicateTool { .. } => FailureKind::DuplicateTool,
            Self::UnknownTool { .. } => FailureKind::UnknownTool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ToolError::network("refused").is_transient());
        assert!(ToolError::timeout(500).is_transient());
        assert!(ToolError::rate_limited(None).is_transient());
        assert!(ToolError::failed("upstream 502").is_transient());
        assert!(!ToolError::invalid_input("missing city").is_transient());
        assert!(!ToolError::unauthorized("bad key").is_transient());
    }

    #[test]
    fn kinds_map_to_taxonomy() {
        assert_eq!(
            ToolError::invalid_input("x").kind(),
            FailureKind::InvalidArguments
        );
        assert_eq!(
            ToolError::unauthorized("x").kind(),
            FailureKind::Unauthorized
        );
        assert_eq!(RegistryError::unknown("t").kind(), FailureKind::UnknownTool);
    }
}
