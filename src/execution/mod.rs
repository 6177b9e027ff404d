//! Pipeline generation engine

pub mod clarifier;
pub mod engine;
pub mod error;
pub mod explain;
pub mod planner;
pub mod progress;
pub mod prompt;
pub mod search;
pub mod selector;
pub mod validator;

pub use engine::{EventHandler, GenerationEngine, GenerationEvent, GenerationRequest, Stage};
pub use error::GenerationError;
pub use progress::{ProgressError, ProgressTracker};
pub use search::SearchOutcome;
pub use selector::SelectedComponent;
pub use validator::{RestructureOutcome, Severity, ValidationIssue, ValidationReport};
