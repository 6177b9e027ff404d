//! Query planner - turns a prompt into web search queries

use crate::core::config::GenerationSettings;
use crate::execution::prompt::{strip_code_fences, truncate_for_log, MAX_LOG_CHARS};
use crate::oracle::{CompletionRequest, LanguageOracle};
use tracing::{debug, info, warn};

/// Number of queries every plan contains
pub const QUERY_COUNT: usize = 3;

const PLANNER_SYSTEM_PROMPT: &str = "You are a research assistant for ML pipeline design. \
Given a user request, write exactly three web search queries that narrow progressively: \
first a broad overview of the problem, then recent developments, then concrete \
implementation details. Respond with a JSON array of three strings and nothing else.";

/// Deterministic queries used when the oracle's plan is unusable
pub fn fallback_queries(prompt: &str) -> Vec<String> {
    vec![
        format!("{} overview and techniques", prompt),
        format!("latest approaches for {}", prompt),
        format!("best practices for {}", prompt),
    ]
}

/// Parse an oracle plan
///
/// Accepts a JSON array of at least [`QUERY_COUNT`] non-empty strings and
/// keeps the first [`QUERY_COUNT`] of them.
pub fn parse_queries(output: &str) -> Option<Vec<String>> {
    let queries: Vec<String> = serde_json::from_str(strip_code_fences(output)).ok()?;
    let queries: Vec<String> = queries
        .into_iter()
        .map(|q| q.trim().to_string())
        .collect();

    if queries.len() < QUERY_COUNT || queries.iter().take(QUERY_COUNT).any(String::is_empty) {
        return None;
    }

    Some(queries.into_iter().take(QUERY_COUNT).collect())
}

/// Ask the oracle for search queries, falling back to fixed phrasings
///
/// Never fails: oracle errors and malformed output both yield
/// [`fallback_queries`].
pub async fn plan_queries<L>(
    oracle: &L,
    prompt: &str,
    settings: &GenerationSettings,
) -> Vec<String>
where
    L: LanguageOracle + ?Sized,
{
    let request = CompletionRequest::new(PLANNER_SYSTEM_PROMPT, format!("User request: {}", prompt))
        .with_temperature(settings.planning_temperature)
        .with_max_tokens(settings.planning_max_tokens);

    let output = match oracle.complete(request).await {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "query planning failed, using fallback queries");
            return fallback_queries(prompt);
        }
    };
    debug!(output = %truncate_for_log(&output, MAX_LOG_CHARS), "planner raw output");

    match parse_queries(&output) {
        Some(queries) => {
            info!(count = queries.len(), "planned search queries");
            queries
        }
        None => {
            warn!("planner output was not a JSON array of queries, using fallback queries");
            fallback_queries(prompt)
        }
    }
}
