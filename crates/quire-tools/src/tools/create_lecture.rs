//! `create_lecture` tool.

use std::sync::Arc;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult, text_result};
use quire_core::workspace::LECTURE_MARKER;
use serde_json::{Value, json};

use super::notebook_error;
use crate::errors::ToolError;
use crate::notebook::{Notebook, Registration};
use crate::traits::{QuireTool, ToolContext};
use crate::utils::schema::ToolSchemaBuilder;
use crate::utils::validation::{validate_required_string, validate_required_u32};

/// Creates a lecture from the template and registers it in the master.
pub struct CreateLectureTool {
    notebook: Arc<Notebook>,
}

impl CreateLectureTool {
    /// Create the tool over `notebook`.
    pub fn new(notebook: Arc<Notebook>) -> Self {
        Self { notebook }
    }
}

#[async_trait]
impl QuireTool for CreateLectureTool {
    fn name(&self) -> &str {
        "create_lecture"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Notebook
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "create_lecture",
            "Create a new lecture file from the template with its number, date and topic filled in, \
             and add it to master.tex. Use write_file afterwards to add content.",
        )
        .required_property(
            "lecture_num",
            json!({"type": "integer", "description": "Lecture number, e.g. 6 for lec06"}),
        )
        .required_property(
            "date",
            json!({"type": "string", "description": "Lecture date, e.g. \"February 7, 2026\""}),
        )
        .required_property(
            "topic",
            json!({"type": "string", "description": "Lecture topic"}),
        )
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let number = match validate_required_u32(&params, "lecture_num") {
            Ok(n) => n,
            Err(e) => return Ok(e),
        };
        let date = match validate_required_string(&params, "date", "lecture date") {
            Ok(d) => d,
            Err(e) => return Ok(e),
        };
        let topic = match validate_required_string(&params, "topic", "lecture topic") {
            Ok(t) => t,
            Err(e) => return Ok(e),
        };

        let created = match self.notebook.create_lecture(number, &date, &topic).await {
            Ok(c) => c,
            Err(e) => return Ok(notebook_error(&e)),
        };

        let id = &created.id;
        let message = match created.registration {
            Registration::Registered => {
                format!("Created {id}/{id}.tex, ready for content. Added to master.tex.")
            }
            Registration::MarkerMissing => format!(
                "Created {id}/{id}.tex but could not find {LECTURE_MARKER} in master.tex. \
                 Add the \\subfile line manually."
            ),
            Registration::NoContainer => format!(
                "Created {id}/{id}.tex, ready for content. master.tex not found, so it was not registered."
            ),
        };
        Ok(text_result(message, false).with_details(json!({"id": id, "path": created.path})))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_ctx, notebook_fixture};

    #[tokio::test]
    async fn creates_and_rejects_duplicate() {
        let (_dir, nb) = notebook_fixture();
        let tool = CreateLectureTool::new(Arc::new(nb));
        let args = json!({"lecture_num": 6, "date": "February 7, 2026", "topic": "Sequences"});

        let r = tool.execute(args.clone(), &make_ctx()).await.unwrap();
        assert_eq!(r.content, "Created lec06/lec06.tex, ready for content. Added to master.tex.");

        let r = tool.execute(args, &make_ctx()).await.unwrap();
        assert!(r.is_error());
        assert_eq!(r.content, "Error: lec06 already exists");
    }

    #[tokio::test]
    async fn rejects_bad_number() {
        let (_dir, nb) = notebook_fixture();
        let tool = CreateLectureTool::new(Arc::new(nb));
        let r = tool
            .execute(json!({"lecture_num": "six", "date": "d", "topic": "t"}), &make_ctx())
            .await
            .unwrap();
        assert!(r.is_error());
    }
}
