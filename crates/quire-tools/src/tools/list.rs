//! `list_files` tool.

use std::sync::Arc;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult, text_result};
use serde_json::{Value, json};

use super::notebook_error;
use crate::errors::ToolError;
use crate::notebook::Notebook;
use crate::traits::{QuireTool, ToolContext};
use crate::utils::schema::ToolSchemaBuilder;
use crate::utils::validation::get_optional_string;

/// Lists a notebook directory.
pub struct ListFilesTool {
    notebook: Arc<Notebook>,
}

impl ListFilesTool {
    /// Create the tool over `notebook`.
    pub fn new(notebook: Arc<Notebook>) -> Self {
        Self { notebook }
    }
}

#[async_trait]
impl QuireTool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Notebook
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "list_files",
            "List a notebook directory. Each line is `d name` for a directory or `f name` for a file.",
        )
        .property(
            "subdir",
            json!({"type": "string", "description": "Directory relative to the class directory (default: the class directory)"}),
        )
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let subdir = get_optional_string(&params, "subdir").unwrap_or_default();

        Ok(match self.notebook.list(&subdir).await {
            Ok(entries) if entries.is_empty() => text_result("(empty directory)", false),
            Ok(entries) => text_result(
                entries
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
                false,
            ),
            Err(e) => notebook_error(&e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_ctx, notebook_fixture};

    #[tokio::test]
    async fn lists_root_by_default() {
        let (_dir, nb) = notebook_fixture();
        let tool = ListFilesTool::new(Arc::new(nb));
        let r = tool.execute(json!({}), &make_ctx()).await.unwrap();
        assert_eq!(r.content, "d notes");
    }

    #[tokio::test]
    async fn empty_and_missing_directories() {
        let (dir, nb) = notebook_fixture();
        std::fs::create_dir_all(dir.path().join("hw")).unwrap();
        let tool = ListFilesTool::new(Arc::new(nb));

        let r = tool.execute(json!({"subdir": "hw"}), &make_ctx()).await.unwrap();
        assert_eq!(r.content, "(empty directory)");

        let r = tool.execute(json!({"subdir": "nope"}), &make_ctx()).await.unwrap();
        assert_eq!(r.content, "Error: not a directory: nope");
    }
}
