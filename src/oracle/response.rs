//! Oracle request and response types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for oracle calls
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("http error: {0}")]
    Http(String),

    #[error("response error: {0}")]
    Response(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// A single chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// How much effort the search provider spends per query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,

    /// Result excerpt; providers call this `content` or `snippet`
    #[serde(default, alias = "content")]
    pub snippet: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: None,
        }
    }
}

/// Results for one query
///
/// Providers may answer with a success status and an `error` body; such a
/// response carries no usable hits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn with_hits(results: Vec<SearchHit>) -> Self {
        Self { results, error: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("system", "user")
            .with_temperature(0.2)
            .with_max_tokens(64);
        assert_eq!(request.system, "system");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_tokens, 64);
    }

    #[test]
    fn test_search_hit_accepts_content_alias() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"results": [{"title": "A", "url": "https://a.example", "content": "alpha", "score": 0.9}]}"#,
        )
        .unwrap();
        assert_eq!(response.results[0].snippet, "alpha");
        assert_eq!(response.results[0].url.as_deref(), Some("https://a.example"));
    }

    #[test]
    fn test_error_body_is_parsed() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"error": "rate limit exceeded"}"#).unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.error.as_deref(), Some("rate limit exceeded"));

        let ok: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(ok.error.is_none());
    }
}
