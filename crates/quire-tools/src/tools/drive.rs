//! Drive import tools: `find_file`, `list_drive_files`, `download_file`.
//!
//! Offered in conversation only when a Drive API key is configured. Answers
//! are the service's JSON, pretty-printed.

use std::sync::Arc;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult, error_result, text_result};
use serde_json::{Value, json};
use tracing::warn;

use crate::drive::DriveClient;
use crate::errors::{DriveError, ToolError};
use crate::traits::{QuireTool, ToolContext};
use crate::utils::schema::ToolSchemaBuilder;
use crate::utils::validation::{get_optional_string, validate_required_string};

fn render(action: &str, outcome: Result<Value, DriveError>) -> Result<ToolResult, ToolError> {
    match outcome {
        Ok(data) => Ok(text_result(serde_json::to_string_pretty(&data)?, false)),
        Err(e) => {
            warn!(action, error = %e, "Drive action failed");
            Ok(error_result(format!("Error: Drive {action} failed: {e}")))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// find_file
// ─────────────────────────────────────────────────────────────────────────────

/// Searches the student's Drive.
pub struct FindDriveFileTool {
    client: Arc<dyn DriveClient>,
}

impl FindDriveFileTool {
    /// Create the tool over `client`.
    pub fn new(client: Arc<dyn DriveClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuireTool for FindDriveFileTool {
    fn name(&self) -> &str {
        "find_file"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Import
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "find_file",
            "Search the student's Google Drive when they ask to find or import a file. \
             Returns matching files with name, id and mimeType.",
        )
        .required_property(
            "search_query",
            json!({"type": "string", "description": "File name, keyword or type, e.g. \"Lecture 3 slides\""}),
        )
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let query = match validate_required_string(&params, "search_query", "what to search for") {
            Ok(q) => q,
            Err(e) => return Ok(e),
        };
        render("search", self.client.find_files(&query).await)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// list_drive_files
// ─────────────────────────────────────────────────────────────────────────────

/// Lists one Drive folder.
pub struct ListDriveFilesTool {
    client: Arc<dyn DriveClient>,
}

impl ListDriveFilesTool {
    /// Create the tool over `client`.
    pub fn new(client: Arc<dyn DriveClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuireTool for ListDriveFilesTool {
    fn name(&self) -> &str {
        "list_drive_files"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Import
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "list_drive_files",
            "Browse the student's Google Drive. Without arguments lists the top level; pass a \
             folder_id to list that folder.",
        )
        .property(
            "folder_id",
            json!({"type": "string", "description": "Drive folder id, defaults to root"}),
        )
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let folder = get_optional_string(&params, "folder_id")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| "root".to_string());
        render("list", self.client.list_folder(&folder).await)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// download_file
// ─────────────────────────────────────────────────────────────────────────────

/// Downloads one Drive file.
pub struct DownloadDriveFileTool {
    client: Arc<dyn DriveClient>,
}

impl DownloadDriveFileTool {
    /// Create the tool over `client`.
    pub fn new(client: Arc<dyn DriveClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuireTool for DownloadDriveFileTool {
    fn name(&self) -> &str {
        "download_file"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Import
    }

    fn definition(&self) -> Tool {
        ToolSchemaBuilder::new(
            "download_file",
            "Download a file from the student's Google Drive, using an id from find_file.",
        )
        .required_property(
            "file_id",
            json!({"type": "string", "description": "Drive file id from find_file"}),
        )
        .required_property(
            "file_name",
            json!({"type": "string", "description": "File name to report back"}),
        )
        .build()
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let file_id = match validate_required_string(&params, "file_id", "Drive file id") {
            Ok(id) => id,
            Err(e) => return Ok(e),
        };
        let file_name = match validate_required_string(&params, "file_name", "file name") {
            Ok(name) => name,
            Err(e) => return Ok(e),
        };
        let outcome = self.client.download(&file_id).await.map(|content| {
            json!({
                "status": "downloaded",
                "file_name": file_name,
                "content": content,
            })
        });
        render("download", outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::MockDriveClient;
    use crate::testutil::make_ctx;

    #[tokio::test]
    async fn find_returns_pretty_json() {
        let mut drive = MockDriveClient::new();
        let _ = drive
            .expect_find_files()
            .withf(|q| q == "midterm review")
            .returning(|_| Ok(json!({"files": [{"id": "f1"}]})));
        let tool = FindDriveFileTool::new(Arc::new(drive));

        let r = tool
            .execute(json!({"search_query": "midterm review"}), &make_ctx())
            .await
            .unwrap();
        assert!(!r.is_error());
        let parsed: Value = serde_json::from_str(&r.content).unwrap();
        assert_eq!(parsed["files"][0]["id"], "f1");
    }

    #[tokio::test]
    async fn list_defaults_to_root() {
        let mut drive = MockDriveClient::new();
        let _ = drive
            .expect_list_folder()
            .withf(|f| f == "root")
            .returning(|_| Ok(json!({})));
        let tool = ListDriveFilesTool::new(Arc::new(drive));

        let r = tool.execute(json!({}), &make_ctx()).await.unwrap();
        assert_eq!(r.content, "{}");
    }

    #[tokio::test]
    async fn download_wraps_content() {
        let mut drive = MockDriveClient::new();
        let _ = drive
            .expect_download()
            .withf(|id| id == "f1")
            .returning(|_| Ok(json!("slides text")));
        let tool = DownloadDriveFileTool::new(Arc::new(drive));

        let r = tool
            .execute(json!({"file_id": "f1", "file_name": "lec3.pdf"}), &make_ctx())
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&r.content).unwrap();
        assert_eq!(
            parsed,
            json!({"status": "downloaded", "file_name": "lec3.pdf", "content": "slides text"})
        );
    }

    #[tokio::test]
    async fn failures_are_error_text() {
        let mut drive = MockDriveClient::new();
        let _ = drive.expect_find_files().returning(|_| {
            Err(DriveError::Rejected {
                message: "quota exceeded".into(),
            })
        });
        let tool = FindDriveFileTool::new(Arc::new(drive));

        let r = tool
            .execute(json!({"search_query": "x"}), &make_ctx())
            .await
            .unwrap();
        assert!(r.is_error());
        assert_eq!(r.content, "Error: Drive search failed: quota exceeded");
    }

    #[tokio::test]
    async fn download_requires_an_id() {
        let tool = DownloadDriveFileTool::new(Arc::new(MockDriveClient::new()));
        let r = tool
            .execute(json!({"file_name": "a.pdf"}), &make_ctx())
            .await
            .unwrap();
        assert!(r.is_error());
        assert!(r.content.starts_with("Error: missing required parameter: file_id"));
    }
}
