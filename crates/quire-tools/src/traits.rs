//! Core trait and DI abstractions for the tool system.
//!
//! Defines [`QuireTool`], the trait every tool adapter implements, plus the
//! injection seams tools use to reach the outside world: [`ProcessRunner`]
//! for the typesetting executables and [`HttpClient`] for web search and
//! Drive import.

use std::path::PathBuf;

use async_trait::async_trait;
use quire_core::tools::{Tool, ToolCategory, ToolResult};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::errors::{HttpError, ProcessError, ToolError};

// ─────────────────────────────────────────────────────────────────────────────
// Tool context
// ─────────────────────────────────────────────────────────────────────────────

/// Execution context passed to every tool invocation.
#[derive(Clone, Debug)]
pub struct ToolContext {
    /// Unique ID of this tool call.
    pub tool_call_id: String,
    /// Cancellation token for cooperative cancellation.
    pub cancellation: CancellationToken,
}

impl ToolContext {
    /// Context for a fresh call with its own cancellation token.
    pub fn new(tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            cancellation: CancellationToken::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// QuireTool trait
// ─────────────────────────────────────────────────────────────────────────────

/// The trait every tool adapter implements.
///
/// User-visible failures are returned as `Ok` error results; `Err` is
/// reserved for failures of the adapter itself.
#[async_trait]
pub trait QuireTool: Send + Sync {
    /// Tool name, the exact string the collaborator calls.
    fn name(&self) -> &str;

    /// Tool category for grouping.
    fn category(&self) -> ToolCategory;

    /// Schema handed to the collaborator.
    fn definition(&self) -> Tool;

    /// Execute the tool with JSON arguments.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Process types
// ─────────────────────────────────────────────────────────────────────────────

/// One external program invocation.
#[derive(Clone, Debug)]
pub struct ProcessSpec {
    /// Executable name or path.
    pub program: String,
    /// Arguments, passed without a shell.
    pub args: Vec<String>,
    /// Working directory.
    pub working_directory: PathBuf,
    /// Timeout in milliseconds.
    pub timeout_ms: u64,
    /// Cancellation token.
    pub cancellation: CancellationToken,
}

/// Output from a subprocess.
#[derive(Clone, Debug, Default)]
pub struct ProcessOutput {
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Exit code (`-1` when killed or unknown).
    pub exit_code: i32,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Whether the process timed out.
    pub timed_out: bool,
    /// Whether the process was interrupted.
    pub interrupted: bool,
}

impl ProcessOutput {
    /// Whether the process ran to completion with exit code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out && !self.interrupted
    }
}

/// Subprocess execution (compile pipeline).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run one program to completion, timeout, or cancellation.
    async fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, ProcessError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP response from a fetch operation.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// HTTP client for the web-search and Drive services.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request with query parameters and headers.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError>;

    /// POST a JSON body with headers.
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_context_new_has_live_token() {
        let ctx = ToolContext::new("call-1");
        assert_eq!(ctx.tool_call_id, "call-1");
        assert!(!ctx.cancellation.is_cancelled());
    }

    #[test]
    fn output_success_requires_clean_exit() {
        let ok = ProcessOutput::default();
        assert!(ok.success());
        let failed = ProcessOutput {
            exit_code: 1,
            ..ProcessOutput::default()
        };
        assert!(!failed.success());
        let timed_out = ProcessOutput {
            timed_out: true,
            ..ProcessOutput::default()
        };
        assert!(!timed_out.success());
    }
}
