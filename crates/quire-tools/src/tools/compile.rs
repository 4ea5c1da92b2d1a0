//! `compile_notes` tool.

use std::sync::Arc;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult, error_result, text_result};
use quire_core::workspace::MASTER_TARGET;
use serde_json::{Value, json};

use crate::compile::Compiler;
use crate::errors::{CompileError, ToolError};
use crate::traits::{QuireTool, ToolContext};
use crate::utils::schema::ToolSchemaBuilder;
use crate::utils::validation::get_optional_string;

/// Compiles the notebook or a single document to PDF.
pub struct CompileNotesTool {
    compiler: Arc<Compiler>,
}

impl CompileNotesTool {
    /// Create the tool over `compiler`.
    pub fn new(compiler: Arc<Compiler>) -> Self {
        Self { compiler }
    }
}

/// Typesetting failures are reported as-is; everything else gets `Error:`.
fn compile_error(err: &CompileError) -> ToolResult {
    if err.is_typeset_failure() {
        error_result(err.to_string())
    } else {
        error_result(format!("Error: {err}"))
    }
}

#[async_trait]
impl QuireTool for CompileNotesTool {
    fn name(&self) -> &str {
        "compile_notes"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Compile
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "compile_notes",
            "Compile notes to PDF. \"master\" builds the whole notebook with its table of contents \
             and index; a lecture id such as \"lec03\" builds that lecture alone. Returns a download link.",
        )
        .property(
            "target",
            json!({"type": "string", "description": "\"master\" (default) or a lecture id", "default": MASTER_TARGET}),
        )
        .build()
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let target = get_optional_string(&params, "target").unwrap_or_else(|| MASTER_TARGET.into());

        Ok(match self.compiler.compile(&target, &ctx.cancellation).await {
            Ok(artifact) => text_result(artifact.message(), false).with_details(json!({
                "file": artifact.file_name,
                "sizeBytes": artifact.size_bytes,
                "url": artifact.url,
            })),
            Err(e) => compile_error(&e),
        })
    }
}
