//! Search executor - runs planned queries concurrently

use crate::oracle::{SearchDepth, SearchHit, SearchOracle, SearchResponse};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Settled result of one query
///
/// A failed query keeps its place in the batch with `error` set and no hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub query: String,

    #[serde(default)]
    pub hits: Vec<SearchHit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    pub fn success(query: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        Self {
            query: query.into(),
            hits,
            error: None,
        }
    }

    pub fn failure(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            hits: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Run every query against the search oracle and wait for all of them
///
/// The returned outcomes line up one-to-one with `queries`. Failures are
/// captured per query and never cancel siblings.
pub async fn run_searches<S>(
    oracle: &S,
    queries: &[String],
    depth: SearchDepth,
    max_results: u32,
) -> Vec<SearchOutcome>
where
    S: SearchOracle + ?Sized,
{
    let searches = queries.iter().map(|query| async move {
        match oracle.search(query, depth, max_results).await {
            Ok(SearchResponse { error: Some(error), .. }) => {
                warn!(query = %query, error = %error, "search provider returned an error body");
                SearchOutcome::failure(query.clone(), error)
            }
            Ok(response) => {
                debug!(query = %query, hits = response.results.len(), "search settled");
                SearchOutcome::success(query.clone(), response.results)
            }
            Err(e) => {
                warn!(query = %query, error = %e, "search failed");
                SearchOutcome::failure(query.clone(), e.to_string())
            }
        }
    });

    join_all(searches).await
}
