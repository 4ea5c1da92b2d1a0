//! `search_web` tool, available to the fact-check pass.

use std::sync::Arc;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult, error_result, text_result};
use serde_json::{Value, json};
use tracing::warn;

use crate::errors::ToolError;
use crate::search::SearchClient;
use crate::traits::{QuireTool, ToolContext};
use crate::utils::schema::ToolSchemaBuilder;
use crate::utils::validation::validate_required_string;

/// Searches the web to verify a claim.
pub struct SearchWebTool {
    client: Arc<dyn SearchClient>,
}

impl SearchWebTool {
    /// Create the tool over `client`.
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuireTool for SearchWebTool {
    fn name(&self) -> &str {
        "search_web"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Search
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "search_web",
            "Search the web to verify a factual claim: dates, attributions, names of theorems and \
             concepts. Use a specific query such as \"who proved the Heine-Borel theorem\". \
             Returns a JSON list of {title, url, snippets}.",
        )
        .required_property(
            "query",
            json!({"type": "string", "description": "Specific search query"}),
        )
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let query = match validate_required_string(&params, "query", "a search query") {
            Ok(q) => q,
            Err(e) => return Ok(e),
        };

        match self.client.search(&query).await {
            Ok(hits) => {
                let body = serde_json::to_string_pretty(&hits)?;
                Ok(text_result(body, false).with_details(json!({"resultCount": hits.len()})))
            }
            Err(e) => {
                warn!(%query, error = %e, "web search failed");
                Ok(error_result(format!("Error: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use crate::search::SearchHit;
    use crate::testutil::make_ctx;

    struct FixedSearch(Result<Vec<SearchHit>, u16>);

    #[async_trait]
    impl SearchClient for FixedSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
            self.0.clone().map_err(|status| SearchError::Status { status })
        }
    }

    #[tokio::test]
    async fn returns_hits_as_json() {
        let hit = SearchHit {
            title: "Heine-Borel".into(),
            url: "https://example.org".into(),
            snippets: vec!["Closed and bounded".into()],
        };
        let tool = SearchWebTool::new(Arc::new(FixedSearch(Ok(vec![hit.clone()]))));
        let r = tool.execute(json!({"query": "heine borel"}), &make_ctx()).await.unwrap();
        let parsed: Vec<SearchHit> = serde_json::from_str(&r.content).unwrap();
        assert_eq!(parsed, vec![hit]);
    }

    #[tokio::test]
    async fn failures_are_error_text() {
        let tool = SearchWebTool::new(Arc::new(FixedSearch(Err(500))));
        let r = tool.execute(json!({"query": "x"}), &make_ctx()).await.unwrap();
        assert!(r.is_error());
        assert_eq!(r.content, "Error: search API error: HTTP 500");
    }
}
