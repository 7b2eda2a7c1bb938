//! Web search over the Tavily API, used for company research.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::SearchError;
use crate::models::truncate_chars;

pub const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RESULTS_PER_QUERY: u32 = 6;
const SEARCH_DEPTH: &str = "advanced";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Clone)]
pub struct TavilyClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl TavilyClient {
    pub fn new(api_key: String) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(SEARCH_TIMEOUT).build()?,
            api_key,
            endpoint: TAVILY_SEARCH_URL.to_string(),
        })
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        debug!("Searching: {query}");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SearchRequest {
                api_key: &self.api_key,
                query,
                max_results: MAX_RESULTS_PER_QUERY,
                search_depth: SEARCH_DEPTH,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: truncate_chars(&message, 300).to_string(),
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }
}

/// Keeps the first hit for each URL, preserving order, up to `limit` hits.
pub fn dedup_by_url(hits: impl IntoIterator<Item = SearchHit>, limit: usize) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.url.clone()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str, content: &str) -> SearchHit {
        SearchHit {
            url: url.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let hits = vec![
            hit("https://a", "first a"),
            hit("https://b", "b"),
            hit("https://a", "second a"),
            hit("https://c", "c"),
        ];
        let out = dedup_by_url(hits, 10);
        let contents: Vec<_> = out.iter().map(|h| h.content.as_str()).collect();
        assert_eq!(contents, vec!["first a", "b", "c"]);
    }

    #[test]
    fn test_dedup_respects_limit() {
        let hits = (0..20).map(|i| hit(&format!("https://{i}"), "x"));
        assert_eq!(dedup_by_url(hits, 10).len(), 10);
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"results":[{"url":"https://a"}],"query":"q"}"#).unwrap();
        assert_eq!(body.results, vec![hit("https://a", "")]);

        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let client = TavilyClient {
            client: Client::new(),
            api_key: "k".to_string(),
            endpoint: "http://127.0.0.1:9/search".to_string(),
        };
        let err = client.search("Acme").await.unwrap_err();
        assert!(matches!(err, SearchError::Http(_)));
    }
}
