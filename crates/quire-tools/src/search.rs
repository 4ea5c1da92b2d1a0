//! Web-search client used by the fact-check pass.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::SearchError;
use crate::traits::HttpClient;

/// Snippets kept per hit.
const MAX_SNIPPETS: usize = 2;

/// One ranked search result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Leading text snippets.
    pub snippets: Vec<String>,
}

/// A web-search capability.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Ranked results for a free-text query.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

/// You.com search API client.
pub struct YouSearchClient {
    http: Arc<dyn HttpClient>,
    api_key: String,
    endpoint: String,
    num_results: u32,
}

impl YouSearchClient {
    /// Create a client. An empty key fails every search with
    /// [`SearchError::MissingApiKey`].
    pub fn new(
        http: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        num_results: u32,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            num_results,
        }
    }
}

#[async_trait]
impl SearchClient for YouSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let response = self
            .http
            .get(
                &self.endpoint,
                &[
                    ("query", query.to_string()),
                    ("count", self.num_results.to_string()),
                ],
                &[("X-API-Key", &self.api_key), ("Accept", "application/json")],
            )
            .await?;

        if !(200..300).contains(&response.status) {
            return Err(SearchError::Status {
                status: response.status,
            });
        }

        let body: Value = serde_json::from_str(&response.body)?;
        let hits = parse_hits(&body);
        debug!(query, hits = hits.len(), "search completed");
        Ok(hits)
    }
}

/// Hits from `results.web[]`; anything else in the body is ignored.
fn parse_hits(body: &Value) -> Vec<SearchHit> {
    body.pointer("/results/web")
        .and_then(Value::as_array)
        .map(|web| {
            web.iter()
                .map(|hit| SearchHit {
                    title: str_field(hit, "title"),
                    url: str_field(hit, "url"),
                    snippets: hit
                        .get("snippets")
                        .and_then(Value::as_array)
                        .map(|s| {
                            s.iter()
                                .filter_map(Value::as_str)
                                .take(MAX_SNIPPETS)
                                .map(String::from)
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
