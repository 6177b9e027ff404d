//! Generation mode and search-step state models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a pipeline request is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Select components directly from the prompt
    #[default]
    Quick,
    /// Plan queries, search the web, then select with the findings
    Agentic,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Quick => "quick",
            GenerationMode::Agentic => "agentic",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" => Ok(GenerationMode::Quick),
            "agentic" => Ok(GenerationMode::Agentic),
            other => Err(format!(
                "Unknown generation mode '{}' (expected 'quick' or 'agentic')",
                other
            )),
        }
    }
}

/// Status of a single search step
///
/// The only legal transition is `Pending` to `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Work for the step is still in flight
    #[serde(rename = "loading")]
    Pending,
    /// Work for the step has settled
    #[serde(rename = "complete")]
    Complete,
}

impl StepStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, StepStatus::Complete)
    }
}

/// Kind of work a search step stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// One planned web search
    Web,
    /// Reasoning over the collected findings
    Think,
    /// Final component selection
    Generate,
    /// Generic search work
    Search,
}
