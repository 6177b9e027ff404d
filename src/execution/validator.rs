//! Pipeline validator - structural checks and canonical restructuring

use crate::core::{Component, ComponentType, StageBucket};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// How serious a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding of the structural check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "Warning: {}", self.message),
            Severity::Error => write!(f, "Error: {}", self.message),
        }
    }
}

/// All issues found in one pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    /// Every issue, one per line, under a failure heading
    pub fn failure_message(&self) -> String {
        let lines: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        format!("Pipeline validation failed:\n{}", lines.join("\n"))
    }
}

pub const NO_MODEL_FOR_POSTPROCESSING: &str = "Postprocessing components require a model component";
pub const NO_MODEL_FOR_MONITORING: &str =
    "Monitoring and explainability components require a model component";
pub const NO_COMMON_ENVIRONMENT: &str = "No compatible environment found across components";

/// Environments every component supports; empty for an empty pipeline
pub fn common_environments(components: &[Component]) -> BTreeSet<String> {
    let mut sets = components.iter().map(|c| &c.requirements.environments);
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };
    sets.fold(first.clone(), |acc, envs| acc.intersection(envs).cloned().collect())
}

/// Check an ordered pipeline for structural problems
pub fn validate_pipeline(components: &[Component]) -> ValidationReport {
    let mut issues = Vec::new();

    let has = |t: ComponentType| components.iter().any(|c| c.is_type(t));
    let has_model = has(ComponentType::Model);

    if !has_model && has(ComponentType::Postprocessing) {
        issues.push(ValidationIssue::error(NO_MODEL_FOR_POSTPROCESSING));
    }
    if !has_model && (has(ComponentType::Monitoring) || has(ComponentType::Explainability)) {
        issues.push(ValidationIssue::error(NO_MODEL_FOR_MONITORING));
    }

    for pair in components.windows(2) {
        if pair[0].component_type == pair[1].component_type {
            issues.push(ValidationIssue::warning(format!(
                "Multiple {} components in sequence may impact performance",
                pair[1].component_type
            )));
        }
    }

    if !components.is_empty() && common_environments(components).is_empty() {
        issues.push(ValidationIssue::error(NO_COMMON_ENVIRONMENT));
    }

    ValidationReport { issues }
}

/// Result of restructuring a component set into canonical stage order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestructureOutcome {
    /// False when the set cannot form a pipeline
    pub valid: bool,

    pub message: String,

    /// Components in canonical order; empty when invalid
    pub canonical_order: Vec<Component>,

    /// Whether the canonical order differs from the input order
    pub needs_restructuring: bool,

    pub notes: Vec<String>,
}

impl RestructureOutcome {
    /// The canonical order, only when it differs from the input
    pub fn suggested_order(&self) -> Option<&[Component]> {
        (self.valid && self.needs_restructuring).then_some(self.canonical_order.as_slice())
    }
}

fn bucket_notes(bucket: StageBucket, count: usize) -> (&'static str, Option<&'static str>) {
    let extra = |note| (count > 1).then_some(note);
    match bucket {
        StageBucket::Preparation => (
            "Preprocessing components placed at the start of the pipeline",
            extra("Multiple preprocessing components arranged in sequence - consider potential performance impact"),
        ),
        StageBucket::Model => (
            "Model components placed after preprocessing",
            extra("Multiple model components detected - ensure this is intentional"),
        ),
        StageBucket::Postprocessing => (
            "Postprocessing components arranged after model components",
            extra("Multiple postprocessing components detected - they run in the order given"),
        ),
        StageBucket::Observation => (
            "Monitoring and explainability components placed at the end of the pipeline",
            extra("Multiple monitoring components detected - they run in the order given"),
        ),
    }
}

/// Merge `current` and `new` and sort them into canonical stage order
///
/// Duplicate ids are removed: a component listed more than once in
/// `current` and `new` combined appears once, at its first position.
/// Buckets keep the relative order in which their components first appear.
pub fn restructure(current: &[Component], new: &[Component]) -> RestructureOutcome {
    let mut seen = HashSet::new();
    let mut notes = Vec::new();
    let mut combined: Vec<&Component> = Vec::with_capacity(current.len() + new.len());
    for component in current.iter().chain(new) {
        if seen.insert(component.id.as_str()) {
            combined.push(component);
        } else {
            notes.push(format!("Duplicate component '{}' removed", component.id));
        }
    }

    let in_bucket = |bucket: StageBucket| -> Vec<&Component> {
        combined
            .iter()
            .copied()
            .filter(|c| c.component_type.bucket() == Some(bucket))
            .collect()
    };

    let has_model = !in_bucket(StageBucket::Model).is_empty();
    let has_downstream = !in_bucket(StageBucket::Postprocessing).is_empty()
        || !in_bucket(StageBucket::Observation).is_empty();
    if !has_model && has_downstream {
        return RestructureOutcome {
            valid: false,
            message: "Cannot add postprocessing or monitoring components without a model component"
                .to_string(),
            canonical_order: Vec::new(),
            needs_restructuring: false,
            notes: vec![
                "Add a model component before adding postprocessing or monitoring components"
                    .to_string(),
            ],
        };
    }

    let mut canonical_order = Vec::with_capacity(combined.len());
    for bucket in StageBucket::ORDER {
        let members = in_bucket(bucket);
        if members.is_empty() {
            continue;
        }
        let (placement, extra) = bucket_notes(bucket, members.len());
        notes.push(placement.to_string());
        notes.extend(extra.map(str::to_string));
        canonical_order.extend(members.into_iter().cloned());
    }

    let unclassified: Vec<&str> = combined
        .iter()
        .filter(|c| c.component_type.bucket().is_none())
        .map(|c| c.id.as_str())
        .collect();
    if !unclassified.is_empty() {
        notes.push(format!(
            "Unclassified components left out of the suggested order: {}",
            unclassified.join(", ")
        ));
    }

    let input_ids = current.iter().chain(new).map(|c| c.id.as_str());
    let canonical_ids = canonical_order.iter().map(|c| c.id.as_str());
    let needs_restructuring = !input_ids.eq(canonical_ids);

    let message = if needs_restructuring {
        "Pipeline has been automatically restructured for optimal performance"
    } else {
        "Pipeline structure is already optimal"
    };

    RestructureOutcome {
        valid: true,
        message: message.to_string(),
        canonical_order,
        needs_restructuring,
        notes,
    }
}
