//! Tool registry.
//!
//! Populated once during startup, read-only afterwards. Planning runs share
//! the registry behind an `Arc` and only ever read from it, so concurrent
//! runs need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use super::{RegistryError, Tool, ToolDescriptor};

/// Startup-time catalog of callable tools, keyed by unique name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, rejecting duplicate names.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::duplicate(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Tool>, RegistryError> {
        self.tools.get(name).ok_or_else(|| RegistryError::unknown(name))
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Descriptors of every registered tool, sorted by name.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<ToolDescriptor> =
            self.tools.values().map(|t| t.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::tools::ToolError;

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn input_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }

        async fn execute(
            &self,
            _input: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(serde_json::json!({}))
        }
    }

    #[test]
    fn register_rejects_duplicate_names() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("map_weather"))).unwrap();
        let err = registry
            .register(Arc::new(NamedTool("map_weather")))
            .unwrap_err();
        assert_eq!(err, RegistryError::duplicate("map_weather"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let registry = ToolRegistry::new();
        let err = registry.resolve("map_route").unwrap_err();
        assert_eq!(err, RegistryError::unknown("map_route"));
    }

    #[test]
    fn descriptors_are_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("b"))).unwrap();
        registry.register(Arc::new(NamedTool("a"))).unwrap();
        let names: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
