//! Search step domain model

use crate::core::state::{StepKind, StepStatus};
use serde::{Deserialize, Serialize};

/// A single UI-visible step of the agentic research phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStep {
    /// Query text or a short label for non-search steps
    pub query: String,

    /// Current status
    pub status: StepStatus,

    /// Creation time in milliseconds
    pub timestamp: i64,

    /// Kind of work this step stands for
    #[serde(rename = "type")]
    pub kind: StepKind,
}

impl SearchStep {
    /// Create a pending step
    pub fn pending(query: impl Into<String>, kind: StepKind, timestamp: i64) -> Self {
        Self {
            query: query.into(),
            status: StepStatus::Pending,
            timestamp,
            kind,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Flip the step to complete
    ///
    /// Returns `false` when the step was already complete.
    pub(crate) fn mark_complete(&mut self) -> bool {
        match self.status {
            StepStatus::Pending => {
                self.status = StepStatus::Complete;
                true
            }
            StepStatus::Complete => false,
        }
    }
}
