//! Progress tracker - the UI-visible trace of the research phase

use crate::core::{SearchStep, StepKind};
use crate::execution::search::SearchOutcome;
use std::num::NonZeroU32;
use thiserror::Error;

/// Label of the reasoning step
pub const THINK_LABEL: &str = "Analyzing search results";

/// Label of the generation step
pub const GENERATE_LABEL: &str = "Selecting pipeline components";

/// Error types for progress tracking
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("expected {expected} settled searches, got {settled}")]
    Unsettled { expected: usize, settled: usize },

    #[error("search outcome {position} is for '{found}', expected '{expected}'")]
    Mismatched {
        position: usize,
        expected: String,
        found: String,
    },
}

/// Ordered search steps for one agentic run
///
/// Holds one web step per planned query, then one reasoning step, then one
/// generation step. Steps are never added, removed or reordered after
/// construction, and a step only ever moves from pending to complete.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    steps: Vec<SearchStep>,
    web_steps: usize,
}

impl ProgressTracker {
    /// Build the pending sequence, with timestamps `base_ms + index * unit_ms`
    pub fn new(queries: &[String], base_ms: i64, unit_ms: NonZeroU32) -> Self {
        let unit_ms = i64::from(unit_ms.get());
        let timestamp = |index: usize| base_ms + index as i64 * unit_ms;

        let mut steps: Vec<SearchStep> = queries
            .iter()
            .enumerate()
            .map(|(i, query)| SearchStep::pending(query.clone(), StepKind::Web, timestamp(i)))
            .collect();
        let web_steps = steps.len();
        steps.push(SearchStep::pending(THINK_LABEL, StepKind::Think, timestamp(web_steps)));
        steps.push(SearchStep::pending(
            GENERATE_LABEL,
            StepKind::Generate,
            timestamp(web_steps + 1),
        ));

        Self { steps, web_steps }
    }

    pub fn steps(&self) -> &[SearchStep] {
        &self.steps
    }

    /// Copy of the current sequence, for in-flight observers
    pub fn snapshot(&self) -> Vec<SearchStep> {
        self.steps.clone()
    }

    pub fn into_steps(self) -> Vec<SearchStep> {
        self.steps
    }

    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(SearchStep::is_complete)
    }

    /// Complete every web step once all searches have settled
    ///
    /// `outcomes` must hold exactly one settled outcome per web step, in step
    /// order. Otherwise nothing changes.
    pub fn settle_searches(&mut self, outcomes: &[SearchOutcome]) -> Result<usize, ProgressError> {
        if outcomes.len() != self.web_steps {
            return Err(ProgressError::Unsettled {
                expected: self.web_steps,
                settled: outcomes.len(),
            });
        }

        let web = &mut self.steps[..self.web_steps];
        if let Some((position, (step, outcome))) = web
            .iter()
            .zip(outcomes)
            .enumerate()
            .find(|(_, (step, outcome))| step.query != outcome.query)
        {
            return Err(ProgressError::Mismatched {
                position,
                expected: step.query.clone(),
                found: outcome.query.clone(),
            });
        }

        Ok(web.iter_mut().map(SearchStep::mark_complete).filter(|&flipped| flipped).count())
    }

    /// Complete the reasoning step
    pub fn complete_reasoning(&mut self) -> bool {
        self.complete_kind(StepKind::Think)
    }

    /// Complete the generation step
    pub fn complete_generation(&mut self) -> bool {
        self.complete_kind(StepKind::Generate)
    }

    fn complete_kind(&mut self, kind: StepKind) -> bool {
        self.steps[self.web_steps..]
            .iter_mut()
            .find(|step| step.kind == kind)
            .is_some_and(SearchStep::mark_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StepStatus;

    fn planned() -> Vec<String> {
        vec!["q1".to_string(), "q2".to_string(), "q3".to_string()]
    }

    fn unit(ms: u32) -> NonZeroU32 {
        NonZeroU32::new(ms).unwrap()
    }

    fn settled() -> Vec<SearchOutcome> {
        vec![
            SearchOutcome::success("q1", vec![]),
            SearchOutcome::failure("q2", "timeout"),
            SearchOutcome::success("q3", vec![]),
        ]
    }

    #[test]
    fn test_initial_sequence_layout() {
        let tracker = ProgressTracker::new(&planned(), 10_000, unit(1000));
        let steps = tracker.steps();

        assert_eq!(steps.len(), 5);
        let kinds: Vec<StepKind> = steps.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![StepKind::Web, StepKind::Web, StepKind::Web, StepKind::Think, StepKind::Generate]
        );
        assert!(steps.iter().all(|s| s.status == StepStatus::Pending));
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.timestamp, 10_000 + i as i64 * 1000);
        }
        assert_eq!(steps[3].query, THINK_LABEL);
        assert_eq!(steps[4].query, GENERATE_LABEL);
    }

    #[test]
    fn test_smallest_unit_keeps_timestamps_distinct() {
        let tracker = ProgressTracker::new(&planned(), 500, NonZeroU32::MIN);
        for pair in tracker.steps().windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 1);
        }
    }

    #[test]
    fn test_settle_completes_web_steps_in_place() {
        let mut tracker = ProgressTracker::new(&planned(), 0, unit(1000));
        let before = tracker.snapshot();

        assert_eq!(tracker.settle_searches(&settled()), Ok(3));

        let after = tracker.steps();
        for (old, new) in before.iter().zip(after) {
            assert_eq!(old.query, new.query);
            assert_eq!(old.timestamp, new.timestamp);
            assert_eq!(old.kind, new.kind);
        }
        assert!(after[..3].iter().all(SearchStep::is_complete));
        assert!(!after[3].is_complete());
        assert!(!after[4].is_complete());
    }

    #[test]
    fn test_settle_requires_every_sibling() {
        let mut tracker = ProgressTracker::new(&planned(), 0, unit(1000));
        let outcomes = settled();

        assert_eq!(
            tracker.settle_searches(&outcomes[..2]),
            Err(ProgressError::Unsettled { expected: 3, settled: 2 })
        );
        assert!(tracker.steps().iter().all(|s| !s.is_complete()));
    }

    #[test]
    fn test_settle_rejects_reordered_outcomes() {
        let mut tracker = ProgressTracker::new(&planned(), 0, unit(1000));
        let mut outcomes = settled();
        outcomes.swap(0, 2);

        assert!(matches!(
            tracker.settle_searches(&outcomes),
            Err(ProgressError::Mismatched { position: 0, .. })
        ));
        assert!(tracker.steps().iter().all(|s| !s.is_complete()));
    }

    #[test]
    fn test_completion_never_regresses() {
        let mut tracker = ProgressTracker::new(&planned(), 0, unit(1000));
        tracker.settle_searches(&settled()).unwrap();
        assert!(tracker.complete_reasoning());
        assert!(tracker.complete_generation());
        assert!(tracker.is_complete());

        assert_eq!(tracker.settle_searches(&settled()), Ok(0));
        assert!(!tracker.complete_reasoning());
        assert!(!tracker.complete_generation());
        assert!(tracker.is_complete());
    }
}
