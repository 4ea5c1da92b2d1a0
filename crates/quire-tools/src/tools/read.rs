//! `read_file` tool.

use std::sync::Arc;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult, text_result};
use serde_json::{Value, json};

use super::notebook_error;
use crate::errors::ToolError;
use crate::notebook::Notebook;
use crate::traits::{QuireTool, ToolContext};
use crate::utils::schema::ToolSchemaBuilder;
use crate::utils::validation::validate_required_string;

/// Reads a notebook file.
pub struct ReadFileTool {
    notebook: Arc<Notebook>,
}

impl ReadFileTool {
    /// Create the tool over `notebook`.
    pub fn new(notebook: Arc<Notebook>) -> Self {
        Self { notebook }
    }
}

#[async_trait]
impl QuireTool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Notebook
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "read_file",
            "Read a file from the notebook. The path is relative to the class directory, \
             e.g. notes/latex/lec01/lec01.tex or hw/hw1/assignment.txt.",
        )
        .required_property(
            "path",
            json!({"type": "string", "description": "Path relative to the class directory"}),
        )
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let path = match validate_required_string(&params, "path", "path relative to the class directory") {
            Ok(p) => p,
            Err(e) => return Ok(e),
        };

        Ok(match self.notebook.read(&path).await {
            Ok(content) => text_result(content, false),
            Err(e) => notebook_error(&e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_ctx, notebook_fixture};

    #[tokio::test]
    async fn reads_file() {
        let (_dir, nb) = notebook_fixture();
        let tool = ReadFileTool::new(Arc::new(nb));
        let r = tool
            .execute(json!({"path": "notes/latex/temp/temp.tex"}), &make_ctx())
            .await
            .unwrap();
        assert!(!r.is_error());
        assert!(r.content.starts_with("% LECTURE X: Topic"));
    }

    #[tokio::test]
    async fn failures_are_error_text() {
        let (_dir, nb) = notebook_fixture();
        let tool = ReadFileTool::new(Arc::new(nb));

        let r = tool.execute(json!({"path": "nope.tex"}), &make_ctx()).await.unwrap();
        assert!(r.is_error());
        assert_eq!(r.content, "Error: file not found: nope.tex");

        let r = tool
            .execute(json!({"path": "../../etc/passwd"}), &make_ctx())
            .await
            .unwrap();
        assert_eq!(r.content, "Error: path escapes notebook directory");

        let r = tool.execute(json!({}), &make_ctx()).await.unwrap();
        assert!(r.content.starts_with("Error: missing required parameter: path"));
    }
}
