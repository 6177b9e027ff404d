//! Scripted oracles and catalog builders shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pipeline_generator::core::{AgentProfile, Catalog, Component, ComponentRequirements, ComponentType};
use pipeline_generator::oracle::{
    CompletionRequest, LanguageOracle, OracleError, SearchDepth, SearchHit, SearchOracle,
    SearchResponse,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Language oracle that returns predefined responses in order
///
/// Every request is recorded so tests can inspect the prompts the engine sent.
pub struct ScriptedOracle {
    responses: Arc<Vec<Result<String, String>>>,
    index: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedOracle {
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self::with_results(responses.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Responses where `Err` entries fail the call
    pub fn with_results(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Arc::new(responses),
            index: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the current response index (how many have been used)
    pub fn current_index(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Handle sharing this oracle's script and request log
    pub fn handle(&self) -> Self {
        Self {
            responses: self.responses.clone(),
            index: self.index.clone(),
            requests: self.requests.clone(),
        }
    }
}

#[async_trait]
impl LanguageOracle for ScriptedOracle {
    async fn complete(&self, request: CompletionRequest) -> Result<String, OracleError> {
        self.requests.lock().unwrap().push(request);

        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(idx) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(error)) => Err(OracleError::Http(error.clone())),
            None => Err(OracleError::Response(format!("no scripted response #{}", idx))),
        }
    }
}

enum SearchScript {
    Hits(Vec<SearchHit>),
    Fail(String),
    ErrorBody(String),
}

/// Search oracle with per-query responses and delays
///
/// Queries without a script return no hits.
#[derive(Default)]
pub struct ScriptedSearch {
    scripts: HashMap<String, SearchScript>,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, query: &str, hits: &[(&str, &str)]) -> Self {
        let hits = hits.iter().map(|(title, snippet)| SearchHit::new(*title, *snippet)).collect();
        self.scripts.insert(query.to_string(), SearchScript::Hits(hits));
        self
    }

    pub fn with_failure(mut self, query: &str, error: &str) -> Self {
        self.scripts.insert(query.to_string(), SearchScript::Fail(error.to_string()));
        self
    }

    /// Answer `query` successfully but with an `error` body
    pub fn with_error_body(mut self, query: &str, error: &str) -> Self {
        self.scripts.insert(query.to_string(), SearchScript::ErrorBody(error.to_string()));
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl SearchOracle for ScriptedSearch {
    async fn search(
        &self,
        query: &str,
        _depth: SearchDepth,
        max_results: u32,
    ) -> Result<SearchResponse, OracleError> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }

        match self.scripts.get(query) {
            Some(SearchScript::Fail(error)) => Err(OracleError::Response(error.clone())),
            Some(SearchScript::ErrorBody(error)) => Ok(SearchResponse {
                results: Vec::new(),
                error: Some(error.clone()),
            }),
            Some(SearchScript::Hits(hits)) => Ok(SearchResponse::with_hits(
                hits.iter().take(max_results as usize).cloned().collect(),
            )),
            None => Ok(SearchResponse::default()),
        }
    }
}

/// A component that runs on Python only
pub fn component(id: &str, component_type: ComponentType) -> Component {
    component_in(id, component_type, &["Python 3.7+"])
}

pub fn component_in(id: &str, component_type: ComponentType, environments: &[&str]) -> Component {
    Component {
        id: id.to_string(),
        name: format!("{} component", id),
        component_type,
        description: format!("Does the {} step", id),
        code_snippet: format!("step_{} = build()", id),
        requirements: ComponentRequirements {
            dependencies: vec!["numpy>=1.19.0".to_string()],
            environments: environments.iter().map(|e| e.to_string()).collect(),
            ..ComponentRequirements::default()
        },
        agent: AgentProfile {
            name: format!("{}Bot", id),
            role: "Specialist".to_string(),
            quote: format!("I handle {}.", id),
        },
    }
}

pub fn catalog_of(components: Vec<Component>) -> Arc<Catalog> {
    Arc::new(Catalog::new(components).unwrap())
}

/// Selection output naming `ids` in order
pub fn selection(ids: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| serde_json::json!({"id": id, "reason": format!("{} fits", id)}))
        .collect();
    serde_json::Value::Array(entries).to_string()
}
