//! Errors surfaced by a generation run

use crate::execution::progress::ProgressError;
use crate::oracle::OracleError;
use thiserror::Error;

/// Fatal failures of a generation run
///
/// Recoverable problems (malformed query plans, failed searches, unknown
/// component ids) never reach this type.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Oracle call failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Failed to parse component selection: {0}")]
    SelectionParse(String),

    #[error("Failed to parse clarification questions: {0}")]
    ClarificationParse(String),

    #[error("{0}")]
    Structural(String),

    #[error("Search progress error: {0}")]
    Progress(#[from] ProgressError),
}

impl GenerationError {
    /// Whether the caller sent or triggered invalid content, as opposed to an
    /// infrastructure failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GenerationError::SelectionParse(_)
                | GenerationError::ClarificationParse(_)
                | GenerationError::Structural(_)
        )
    }
}
