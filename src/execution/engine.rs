//! Generation engine - orchestrates a quick or agentic run

use crate::{
    core::{
        config::{GenerationSettings, Settings},
        Catalog, ClarificationResponse, Component, GenerationMode, PipelineResult, SearchStep,
    },
    execution::{
        clarifier::generate_clarification,
        error::GenerationError,
        explain::{explain_pipeline, pipeline_name},
        planner::plan_queries,
        progress::ProgressTracker,
        prompt::{build_selection_prompt, Finding},
        search::{run_searches, SearchOutcome},
        selector::select_components,
        validator::{restructure, validate_pipeline, RestructureOutcome},
    },
    oracle::{LanguageOracle, SearchDepth, SearchOracle},
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Input of a single generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub mode: GenerationMode,
    pub clarification_answers: BTreeMap<String, String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, mode: GenerationMode) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
            clarification_answers: BTreeMap::new(),
        }
    }

    pub fn with_answer(mut self, id: impl Into<String>, answer: impl Into<String>) -> Self {
        self.clarification_answers.insert(id.into(), answer.into());
        self
    }
}

/// Named stages of a run, as reported to event handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Planning,
    Searching,
    Enriching,
    Selecting,
    Validating,
    Explaining,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planning => "planning",
            Stage::Searching => "searching",
            Stage::Enriching => "enriching",
            Stage::Selecting => "selecting",
            Stage::Validating => "validating",
            Stage::Explaining => "explaining",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that can occur during a generation run
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    RunStarted {
        run_id: Uuid,
        mode: GenerationMode,
    },
    StageEntered {
        run_id: Uuid,
        stage: Stage,
    },
    /// Snapshot of the search steps after a status change
    StepsUpdated {
        run_id: Uuid,
        steps: Vec<SearchStep>,
    },
    /// Chosen components as `(id, reason)` pairs in selection order
    ComponentsSelected {
        run_id: Uuid,
        selections: Vec<(String, String)>,
    },
    RunFinished {
        run_id: Uuid,
        name: String,
        components: usize,
    },
    RunFailed {
        run_id: Uuid,
        error: String,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(GenerationEvent) + Send + Sync>;

enum GenerationState {
    Start,
    Planning,
    Searching { queries: Vec<String> },
    Enriching { outcomes: Vec<SearchOutcome> },
    Selecting { findings: Vec<Finding> },
    Validating { components: Vec<Component> },
    Explaining { components: Vec<Component> },
    Done(PipelineResult),
}

impl GenerationState {
    fn stage(&self) -> Option<Stage> {
        match self {
            GenerationState::Start | GenerationState::Done(_) => None,
            GenerationState::Planning => Some(Stage::Planning),
            GenerationState::Searching { .. } => Some(Stage::Searching),
            GenerationState::Enriching { .. } => Some(Stage::Enriching),
            GenerationState::Selecting { .. } => Some(Stage::Selecting),
            GenerationState::Validating { .. } => Some(Stage::Validating),
            GenerationState::Explaining { .. } => Some(Stage::Explaining),
        }
    }
}

/// Per-run bookkeeping
struct Run<'r> {
    id: Uuid,
    request: &'r GenerationRequest,
    tracker: Option<ProgressTracker>,
}

/// Orchestrates planner, search, selector and validator
pub struct GenerationEngine<L, S> {
    llm: L,
    search: S,
    catalog: Arc<Catalog>,
    settings: GenerationSettings,
    search_depth: SearchDepth,
    max_results: u32,
    event_handlers: Vec<EventHandler>,
}

impl<L: LanguageOracle, S: SearchOracle> GenerationEngine<L, S> {
    pub fn new(llm: L, search: S, catalog: Arc<Catalog>) -> Self {
        Self {
            llm,
            search,
            catalog,
            settings: GenerationSettings::default(),
            search_depth: SearchDepth::default(),
            max_results: 5,
            event_handlers: Vec::new(),
        }
    }

    /// Engine configured from loaded settings
    pub fn from_settings(llm: L, search: S, catalog: Arc<Catalog>, settings: &Settings) -> Self {
        Self::new(llm, search, catalog)
            .with_generation_settings(settings.generation.clone())
            .with_search_options(settings.search.depth, settings.search.max_results)
    }

    pub fn with_generation_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_search_options(mut self, depth: SearchDepth, max_results: u32) -> Self {
        self.search_depth = depth;
        self.max_results = max_results;
        self
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(GenerationEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: GenerationEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    fn emit_steps(&self, run: &Run<'_>) {
        if let Some(tracker) = &run.tracker {
            self.emit_event(GenerationEvent::StepsUpdated {
                run_id: run.id,
                steps: tracker.snapshot(),
            });
        }
    }

    /// Generate a pipeline for `request`
    pub async fn generate(&self, request: &GenerationRequest) -> Result<PipelineResult, GenerationError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("generation", run_id = %run_id, mode = %request.mode);

        async move {
            info!("Starting generation run");
            self.emit_event(GenerationEvent::RunStarted {
                run_id,
                mode: request.mode,
            });

            match self.drive(run_id, request).await {
                Ok(result) => {
                    info!(name = %result.name, components = result.components.len(), "Generation run finished");
                    self.emit_event(GenerationEvent::RunFinished {
                        run_id,
                        name: result.name.clone(),
                        components: result.components.len(),
                    });
                    Ok(result)
                }
                Err(e) => {
                    error!(error = %e, "Generation run failed");
                    self.emit_event(GenerationEvent::RunFailed {
                        run_id,
                        error: e.to_string(),
                    });
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Generate a pipeline, folding any failure into the result's `error`
    pub async fn respond(&self, request: &GenerationRequest) -> PipelineResult {
        match self.generate(request).await {
            Ok(result) => result,
            Err(e) => PipelineResult::failure(e.to_string()),
        }
    }

    /// Ask for clarification questions before generating
    pub async fn clarify(&self, prompt: &str, domain: &str) -> Result<ClarificationResponse, GenerationError> {
        generate_clarification(&self.llm, prompt, domain, &self.settings).await
    }

    /// Merge two component sets into canonical stage order
    pub fn restructure(&self, current: &[Component], new: &[Component]) -> RestructureOutcome {
        restructure(current, new)
    }

    async fn drive(&self, run_id: Uuid, request: &GenerationRequest) -> Result<PipelineResult, GenerationError> {
        let mut run = Run {
            id: run_id,
            request,
            tracker: None,
        };
        let mut state = GenerationState::Start;

        loop {
            state = match state {
                GenerationState::Done(result) => return Ok(result),
                GenerationState::Start => self.start(&run),
                GenerationState::Planning => self.planning(&mut run).await,
                GenerationState::Searching { queries } => self.searching(&mut run, queries).await?,
                GenerationState::Enriching { outcomes } => self.enriching(&mut run, outcomes),
                GenerationState::Selecting { findings } => self.selecting(&mut run, findings).await?,
                GenerationState::Validating { components } => self.validating(components)?,
                GenerationState::Explaining { components } => self.explaining(&mut run, components),
            };

            if let Some(stage) = state.stage() {
                info!(stage = %stage, "Entering stage");
                self.emit_event(GenerationEvent::StageEntered { run_id, stage });
            }
        }
    }

    fn start(&self, run: &Run<'_>) -> GenerationState {
        match run.request.mode {
            GenerationMode::Quick => GenerationState::Selecting { findings: Vec::new() },
            GenerationMode::Agentic => GenerationState::Planning,
        }
    }

    async fn planning(&self, run: &mut Run<'_>) -> GenerationState {
        let queries = plan_queries(&self.llm, &run.request.prompt, &self.settings).await;

        let base_ms = chrono::Utc::now().timestamp_millis();
        run.tracker = Some(ProgressTracker::new(&queries, base_ms, self.settings.step_unit_ms));
        self.emit_steps(run);

        GenerationState::Searching { queries }
    }

    async fn searching(
        &self,
        run: &mut Run<'_>,
        queries: Vec<String>,
    ) -> Result<GenerationState, GenerationError> {
        let outcomes = run_searches(&self.search, &queries, self.search_depth, self.max_results).await;

        if let Some(tracker) = run.tracker.as_mut() {
            tracker.settle_searches(&outcomes)?;
        }
        self.emit_steps(run);

        Ok(GenerationState::Enriching { outcomes })
    }

    fn enriching(&self, run: &mut Run<'_>, outcomes: Vec<SearchOutcome>) -> GenerationState {
        let mut findings = Vec::new();
        for outcome in outcomes {
            if let Some(error) = &outcome.error {
                debug!(query = %outcome.query, error = %error, "omitting failed search from prompt");
                continue;
            }
            findings.extend(
                outcome
                    .hits
                    .into_iter()
                    .take(self.settings.snippets_per_search)
                    .map(|hit| Finding {
                        title: hit.title,
                        snippet: hit.snippet,
                    }),
            );
        }
        debug!(findings = findings.len(), "research findings collected");

        if let Some(tracker) = run.tracker.as_mut() {
            tracker.complete_reasoning();
        }
        self.emit_steps(run);

        GenerationState::Selecting { findings }
    }

    async fn selecting(
        &self,
        run: &mut Run<'_>,
        findings: Vec<Finding>,
    ) -> Result<GenerationState, GenerationError> {
        let prompt = build_selection_prompt(
            &run.request.prompt,
            &run.request.clarification_answers,
            &findings,
        );
        let selected = select_components(&self.llm, &prompt, &self.catalog, &self.settings).await?;

        if let Some(tracker) = run.tracker.as_mut() {
            tracker.complete_generation();
        }
        self.emit_steps(run);

        self.emit_event(GenerationEvent::ComponentsSelected {
            run_id: run.id,
            selections: selected
                .iter()
                .map(|s| (s.component.id.clone(), s.reason.clone()))
                .collect(),
        });
        let components: Vec<Component> = selected.into_iter().map(|s| s.component).collect();

        Ok(GenerationState::Validating { components })
    }

    fn validating(&self, components: Vec<Component>) -> Result<GenerationState, GenerationError> {
        let report = validate_pipeline(&components);
        for warning in report.warnings() {
            warn!("{}", warning);
        }
        if report.has_errors() {
            return Err(GenerationError::Structural(report.failure_message()));
        }
        Ok(GenerationState::Explaining { components })
    }

    fn explaining(&self, run: &mut Run<'_>, components: Vec<Component>) -> GenerationState {
        let description = explain_pipeline(&components);
        let name = pipeline_name(&run.request.prompt, self.settings.name_max_chars);
        let search_steps = run.tracker.take().map(ProgressTracker::into_steps);

        GenerationState::Done(PipelineResult::new(name, description, &components, search_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{CompletionRequest, DisabledSearch, OracleError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct QueueOracle(Mutex<Vec<String>>);

    impl QueueOracle {
        fn new(replies: &[&str]) -> Self {
            Self(Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()))
        }
    }

    #[async_trait]
    impl LanguageOracle for QueueOracle {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, OracleError> {
            self.0
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| OracleError::Response("no reply queued".to_string()))
        }
    }

    fn engine(replies: &[&str]) -> GenerationEngine<QueueOracle, DisabledSearch> {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        GenerationEngine::new(QueueOracle::new(replies), DisabledSearch, catalog)
    }

    #[tokio::test]
    async fn test_quick_run_emits_stages_in_order() {
        let mut engine = engine(&[r#"[{"id": "standard_scaler"}, {"id": "logistic_regression"}]"#]);
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = stages.clone();
        engine.add_event_handler(move |event| {
            if let GenerationEvent::StageEntered { stage, .. } = event {
                sink.lock().unwrap().push(stage);
            }
        });

        let result = engine
            .generate(&GenerationRequest::new("scale and classify", GenerationMode::Quick))
            .await
            .unwrap();

        assert_eq!(result.component_ids(), vec!["standard_scaler", "logistic_regression"]);
        assert!(result.search_steps.is_none());
        assert_eq!(
            *stages.lock().unwrap(),
            vec![Stage::Selecting, Stage::Validating, Stage::Explaining]
        );
    }

    #[tokio::test]
    async fn test_structural_error_becomes_error_result() {
        let engine = engine(&[r#"[{"id": "json_exporter"}]"#]);
        let result = engine
            .respond(&GenerationRequest::new("export things", GenerationMode::Quick))
            .await;

        assert!(result.components.is_empty());
        let error = result.error.unwrap();
        assert!(error.starts_with("Pipeline validation failed:"));
        assert!(error.contains("Postprocessing components require a model component"));
    }

    #[tokio::test]
    async fn test_agentic_run_with_failing_searches_still_completes() {
        let engine = engine(&[
            "not a plan",
            r#"[{"id": "logistic_regression"}]"#,
        ]);
        let result = engine
            .generate(&GenerationRequest::new("spam", GenerationMode::Agentic))
            .await
            .unwrap();

        let steps = result.search_steps.unwrap();
        assert_eq!(steps.len(), 5);
        assert!(steps.iter().all(SearchStep::is_complete));
        assert_eq!(steps[0].query, "spam overview and techniques");
    }
}
