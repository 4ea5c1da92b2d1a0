//! `create_session` tool.

use std::sync::Arc;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult, text_result};
use quire_core::workspace::SESSION_MARKER;
use serde_json::{Value, json};

use super::notebook_error;
use crate::errors::ToolError;
use crate::notebook::{Notebook, Registration, SessionLog};
use crate::traits::{QuireTool, ToolContext};
use crate::utils::schema::ToolSchemaBuilder;
use crate::utils::validation::{get_optional_string, validate_required_string};

/// Records a study session and registers it in the session container.
pub struct CreateSessionTool {
    notebook: Arc<Notebook>,
}

impl CreateSessionTool {
    /// Create the tool over `notebook`.
    pub fn new(notebook: Arc<Notebook>) -> Self {
        Self { notebook }
    }
}

#[async_trait]
impl QuireTool for CreateSessionTool {
    fn name(&self) -> &str {
        "create_session"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Notebook
    }

    fn definition(&self) -> Tool {
        let text = |d: &str| json!({"type": "string", "description": d});
        ToolSchemaBuilder::new(
            "create_session",
            "Create a session log and add it to sessions.tex. Call during wrap-up.",
        )
        .required_property("date", text("Session date, YYYY-MM-DD"))
        .required_property("mode", text("Primary activity, e.g. Review, Lecture, Homework"))
        .required_property("summary", text("One-sentence session summary"))
        .required_property("topics", text("Comma-separated topics"))
        .required_property("covered", text("What was accomplished, one item per line"))
        .required_property("next_steps", text("Suggested next steps, one item per line"))
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let date = match validate_required_string(&params, "date", "session date, YYYY-MM-DD") {
            Ok(d) => d,
            Err(e) => return Ok(e),
        };
        let mode = match validate_required_string(&params, "mode", "primary activity") {
            Ok(m) => m,
            Err(e) => return Ok(e),
        };
        let field = |name: &str| get_optional_string(&params, name).unwrap_or_default();
        let log = SessionLog {
            date,
            mode,
            summary: field("summary"),
            topics: field("topics"),
            covered: field("covered"),
            next_steps: field("next_steps"),
        };

        let created = match self.notebook.create_session(&log).await {
            Ok(c) => c,
            Err(e) => return Ok(notebook_error(&e)),
        };

        let mut message = format!("Created session log: {}", created.path);
        match created.registration {
            Registration::Registered => {}
            Registration::MarkerMissing => message.push_str(&format!(
                " (sessions.tex has no {SESSION_MARKER} marker, add the \\subfile line manually)"
            )),
            Registration::NoContainer => message.push_str(" (sessions.tex not found, not registered)"),
        }
        Ok(text_result(message, false).with_details(json!({"id": created.id, "path": created.path})))
    }
}
