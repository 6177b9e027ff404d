//! Language and search oracles
//!
//! Both services are black boxes reached over the network. The generation
//! engine only sees these two traits, so tests can swap in scripted fakes.

pub mod response;

#[cfg(feature = "http")]
pub mod http_client;
#[cfg(feature = "http")]
pub mod search_client;

use async_trait::async_trait;
use std::sync::Arc;

pub use response::{
    CompletionRequest, OracleError, SearchDepth, SearchHit, SearchResponse,
};

#[cfg(feature = "http")]
pub use http_client::HttpLanguageOracle;
#[cfg(feature = "http")]
pub use search_client::TavilySearchOracle;

/// Text completion capability
#[async_trait]
pub trait LanguageOracle: Send + Sync {
    /// Complete a system/user prompt pair and return the raw text
    async fn complete(&self, request: CompletionRequest) -> Result<String, OracleError>;
}

/// Web search capability
#[async_trait]
pub trait SearchOracle: Send + Sync {
    /// Run a single query
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: u32,
    ) -> Result<SearchResponse, OracleError>;
}

#[async_trait]
impl<T: LanguageOracle + ?Sized> LanguageOracle for Arc<T> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, OracleError> {
        (**self).complete(request).await
    }
}

#[async_trait]
impl<T: SearchOracle + ?Sized> SearchOracle for Arc<T> {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: u32,
    ) -> Result<SearchResponse, OracleError> {
        (**self).search(query, depth, max_results).await
    }
}

/// Search oracle for runs that never leave quick mode
///
/// Every query fails, which the search executor records per query.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSearch;

#[async_trait]
impl SearchOracle for DisabledSearch {
    async fn search(
        &self,
        _query: &str,
        _depth: SearchDepth,
        _max_results: u32,
    ) -> Result<SearchResponse, OracleError> {
        Err(OracleError::Config("web search is not configured".to_string()))
    }
}
