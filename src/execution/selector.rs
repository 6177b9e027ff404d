//! Component selector - asks the oracle which catalog components to use

use crate::core::config::GenerationSettings;
use crate::core::{Catalog, Component};
use crate::execution::error::GenerationError;
use crate::execution::prompt::{strip_code_fences, truncate_for_log, MAX_LOG_CHARS};
use crate::oracle::{CompletionRequest, LanguageOracle};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info};

const SELECTOR_SYSTEM_PROMPT: &str = "You are an ML pipeline architect. Your task is to select \
appropriate components from the provided catalog to build a pipeline that addresses the user's \
needs. Consider:
- Required preprocessing steps
- Appropriate model selection
- Necessary postprocessing
- Component compatibility and order

Output a JSON array of component IDs with reasoning for each selection.
Format: [{\"id\": \"component_id\", \"reason\": \"explanation\"}]";

/// One entry of the oracle's selection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectionEntry {
    pub id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A catalog component chosen by the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedComponent {
    pub component: Component,
    pub reason: String,
}

/// Parse the oracle's selection array
pub fn parse_selection(output: &str) -> Result<Vec<SelectionEntry>, GenerationError> {
    serde_json::from_str(strip_code_fences(output))
        .map_err(|e| GenerationError::SelectionParse(e.to_string()))
}

/// Map selection entries onto the catalog, in oracle order
///
/// Ids missing from the catalog are dropped, as are repeats of an id already
/// selected.
pub fn resolve_selection(entries: Vec<SelectionEntry>, catalog: &Catalog) -> Vec<SelectedComponent> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter_map(|entry| {
            let Some(component) = catalog.get(&entry.id) else {
                debug!(id = %entry.id, "dropping unknown component id");
                return None;
            };
            if !seen.insert(entry.id.clone()) {
                debug!(id = %entry.id, "dropping repeated component id");
                return None;
            }
            Some(SelectedComponent {
                component: component.clone(),
                reason: entry.reason.unwrap_or_default(),
            })
        })
        .collect()
}

fn build_user_prompt(prompt: &str, catalog: &Catalog) -> Result<String, GenerationError> {
    let summaries = serde_json::to_string_pretty(&catalog.summaries())
        .map_err(|e| GenerationError::SelectionParse(e.to_string()))?;
    Ok(format!(
        "User Request: {}\n\nAvailable Components:\n{}\n\nSelect components and explain your choices.",
        prompt, summaries
    ))
}

/// Ask the oracle to pick components for `prompt`
pub async fn select_components<L>(
    oracle: &L,
    prompt: &str,
    catalog: &Catalog,
    settings: &GenerationSettings,
) -> Result<Vec<SelectedComponent>, GenerationError>
where
    L: LanguageOracle + ?Sized,
{
    let user = build_user_prompt(prompt, catalog)?;
    debug!(prompt = %truncate_for_log(&user, MAX_LOG_CHARS), "selection prompt");

    let request = CompletionRequest::new(SELECTOR_SYSTEM_PROMPT, user)
        .with_temperature(settings.selection_temperature)
        .with_max_tokens(settings.selection_max_tokens);
    let output = oracle.complete(request).await?;
    debug!(output = %truncate_for_log(&output, MAX_LOG_CHARS), "selection raw output");

    let entries = parse_selection(&output)?;
    let requested = entries.len();
    let selected = resolve_selection(entries, catalog);
    info!(requested, selected = selected.len(), "components selected");

    Ok(selected)
}
