//! Tool adapters exposed to the generation collaborator.
//!
//! Each adapter validates its JSON arguments, calls the typed operation,
//! and renders the outcome as one text result. Typed errors become text
//! here and nowhere else.

pub mod compile;
pub mod create_lecture;
pub mod create_session;
pub mod drive;
pub mod list;
pub mod read;
pub mod web_search;
pub mod write;

pub use compile::CompileNotesTool;
pub use create_lecture::CreateLectureTool;
pub use create_session::CreateSessionTool;
pub use drive::{DownloadDriveFileTool, FindDriveFileTool, ListDriveFilesTool};
pub use list::ListFilesTool;
pub use read::ReadFileTool;
pub use web_search::SearchWebTool;
pub use write::WriteFileTool;

use quire_core::tools::{ToolResult, error_result};

use crate::errors::NotebookError;

/// Render a notebook failure as an `Error:` result.
pub(crate) fn notebook_error(err: &NotebookError) -> ToolResult {
    error_result(format!("Error: {err}"))
}
