//! `write_file` tool.

use std::sync::Arc;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult, text_result};
use serde_json::{Value, json};

use super::notebook_error;
use crate::errors::ToolError;
use crate::notebook::Notebook;
use crate::traits::{QuireTool, ToolContext};
use crate::utils::schema::ToolSchemaBuilder;
use crate::utils::validation::{validate_required_string, validate_string_allow_empty};

/// Creates or overwrites a notebook file.
pub struct WriteFileTool {
    notebook: Arc<Notebook>,
}

impl WriteFileTool {
    /// Create the tool over `notebook`.
    pub fn new(notebook: Arc<Notebook>) -> Self {
        Self { notebook }
    }
}

#[async_trait]
impl QuireTool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Notebook
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "write_file",
            "Write the full content of a notebook file, creating parent directories as needed. \
             Overwrites any existing content.",
        )
        .required_property(
            "path",
            json!({"type": "string", "description": "Path relative to the class directory"}),
        )
        .required_property(
            "content",
            json!({"type": "string", "description": "Complete file content"}),
        )
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let path = match validate_required_string(&params, "path", "path relative to the class directory") {
            Ok(p) => p,
            Err(e) => return Ok(e),
        };
        let content = match validate_string_allow_empty(&params, "content") {
            Ok(c) => c,
            Err(e) => return Ok(e),
        };

        Ok(match self.notebook.write(&path, &content).await {
            Ok(chars) => text_result(format!("Written: {path} ({chars} chars)"), false)
                .with_details(json!({"path": path, "chars": chars})),
            Err(e) => notebook_error(&e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_ctx, notebook_fixture};

    #[tokio::test]
    async fn writes_and_reports_chars() {
        let (dir, nb) = notebook_fixture();
        let tool = WriteFileTool::new(Arc::new(nb));
        let r = tool
            .execute(json!({"path": "hw/hw2/submission/p1.tex", "content": "héllo"}), &make_ctx())
            .await
            .unwrap();
        assert_eq!(r.content, "Written: hw/hw2/submission/p1.tex (5 chars)");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hw/hw2/submission/p1.tex")).unwrap(),
            "héllo"
        );
    }

    #[tokio::test]
    async fn escape_writes_nothing() {
        let (_dir, nb) = notebook_fixture();
        let tool = WriteFileTool::new(Arc::new(nb));
        let r = tool
            .execute(json!({"path": "/tmp/x", "content": "x"}), &make_ctx())
            .await
            .unwrap();
        assert!(r.is_error());
        assert_eq!(r.content, "Error: path escapes notebook directory");
    }
}
