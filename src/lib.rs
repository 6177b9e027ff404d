//! pipeline-generator - assembles ML pipelines from a component catalog with LLM help

pub mod cli;
pub mod core;
pub mod execution;
pub mod oracle;

// Re-export commonly used types
pub use core::{Catalog, Component, ComponentType, GenerationMode, PipelineResult, SearchStep};
pub use execution::{GenerationEngine, GenerationError, GenerationEvent, GenerationRequest};
pub use oracle::{LanguageOracle, SearchOracle};
