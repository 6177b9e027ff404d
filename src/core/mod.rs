//! Core domain models
//!
//! This module defines the catalog components, the research trace and the
//! pipeline result, plus the settings that tune a generation run.

pub mod catalog;
pub mod clarification;
pub mod component;
pub mod config;
pub mod result;
pub mod state;
pub mod step;

pub use catalog::*;
pub use clarification::*;
pub use component::*;
pub use result::*;
pub use state::*;
pub use step::*;
