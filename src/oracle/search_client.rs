//! Tavily web search client

use crate::core::config::SearchSettings;
use crate::oracle::{OracleError, SearchDepth, SearchOracle, SearchResponse};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Search oracle backed by the Tavily search API
#[derive(Debug, Clone)]
pub struct TavilySearchOracle {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
}

impl TavilySearchOracle {
    /// Build a client; fails when no API key is configured
    pub fn new(settings: &SearchSettings) -> Result<Self, OracleError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| OracleError::Config("search API key is not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| OracleError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl SearchOracle for TavilySearchOracle {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: u32,
    ) -> Result<SearchResponse, OracleError> {
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: depth.as_str(),
            max_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(OracleError::Response(format!("HTTP {}: {}", status, text)));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Serialization(e.to_string()))?;
        debug!(query, hits = parsed.results.len(), "search returned");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = TavilySearchOracle::new(&SearchSettings::default()).unwrap_err();
        assert!(matches!(err, OracleError::Config(_)));
    }

    #[test]
    fn test_request_wire_shape() {
        let body = TavilyRequest {
            api_key: "tvly-test",
            query: "spam filters",
            search_depth: SearchDepth::Advanced.as_str(),
            max_results: 3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["search_depth"], "advanced");
        assert_eq!(json["max_results"], 3);
    }

    #[tokio::test]
    #[ignore] // Requires network access and TAVILY_API_KEY
    async fn test_live_search() {
        let settings = SearchSettings {
            api_key: std::env::var("TAVILY_API_KEY").ok(),
            ..SearchSettings::default()
        };
        let oracle = TavilySearchOracle::new(&settings).unwrap();
        let response = oracle.search("rust machine learning", SearchDepth::Basic, 2).await.unwrap();
        assert!(response.results.len() <= 2);
    }
}
