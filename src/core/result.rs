//! Final pipeline result returned to callers

use crate::core::{component::Component, step::SearchStep};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A generated pipeline, or the error that prevented one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Flattened component records, in pipeline order
    pub components: Vec<Map<String, Value>>,

    /// Edges between components (reserved, always empty)
    pub connections: Vec<Map<String, Value>>,

    /// Derived pipeline name
    pub name: String,

    /// Natural-language walkthrough of the pipeline
    pub description: String,

    /// Code snippets of every component, one per line
    #[serde(default)]
    pub code_preview: String,

    /// Research trace, present only for agentic runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_steps: Option<Vec<SearchStep>>,

    /// Failure message; set only when no pipeline was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineResult {
    /// Assemble a successful result
    pub fn new(
        name: String,
        description: String,
        components: &[Component],
        search_steps: Option<Vec<SearchStep>>,
    ) -> Self {
        let code_preview = components
            .iter()
            .map(|c| c.code_snippet.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            components: components.iter().map(Component::to_record).collect(),
            connections: Vec::new(),
            name,
            description,
            code_preview,
            search_steps,
            error: None,
        }
    }

    /// A result carrying only an error message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Ids of the components, in pipeline order
    pub fn component_ids(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter_map(|record| record.get("id").and_then(Value::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_has_no_pipeline() {
        let result = PipelineResult::failure("boom");
        assert!(result.is_error());
        assert!(result.components.is_empty());
        assert!(result.connections.is_empty());
        assert!(result.search_steps.is_none());
    }

    #[test]
    fn test_failure_serializes_error_field() {
        let json = serde_json::to_value(PipelineResult::failure("bad output")).unwrap();
        assert_eq!(json["error"], "bad output");
        assert!(json.get("search_steps").is_none());
    }
}
