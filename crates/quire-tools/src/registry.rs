//! Tool registry, the central index of all registered tools.
//!
//! The [`ToolRegistry`] maps tool names to their [`QuireTool`] implementations.
//! It is handed to the generation collaborator as a [`ToolDispatch`], which
//! both describes the toolset and routes the collaborator's calls back here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use quire_core::generation::ToolDispatch;
use quire_core::tools::{Tool, ToolResult, error_result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::compile::Compiler;
use crate::drive::DriveClient;
use crate::notebook::Notebook;
use crate::search::SearchClient;
use crate::tools::{
    CompileNotesTool, CreateLectureTool, CreateSessionTool, DownloadDriveFileTool,
    FindDriveFileTool, ListDriveFilesTool, ListFilesTool, ReadFileTool, SearchWebTool,
    WriteFileTool,
};
use crate::traits::{QuireTool, ToolContext};

/// Central registry mapping tool names to their implementations.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn QuireTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// The conversational toolset: the six notebook operations.
    pub fn notebook_tools(notebook: Arc<Notebook>, compiler: Arc<Compiler>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ReadFileTool::new(Arc::clone(&notebook))));
        registry.register(Arc::new(WriteFileTool::new(Arc::clone(&notebook))));
        registry.register(Arc::new(ListFilesTool::new(Arc::clone(&notebook))));
        registry.register(Arc::new(CreateLectureTool::new(Arc::clone(&notebook))));
        registry.register(Arc::new(CreateSessionTool::new(notebook)));
        registry.register(Arc::new(CompileNotesTool::new(compiler)));
        registry
    }

    /// The fact-check toolset: web search only.
    pub fn search_tools(client: Arc<dyn SearchClient>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SearchWebTool::new(client)));
        registry
    }

    /// The Drive import toolset.
    pub fn drive_tools(client: Arc<dyn DriveClient>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FindDriveFileTool::new(Arc::clone(&client))));
        registry.register(Arc::new(ListDriveFilesTool::new(Arc::clone(&client))));
        registry.register(Arc::new(DownloadDriveFileTool::new(client)));
        registry
    }

    /// Move every tool of `other` into this registry.
    pub fn merge(&mut self, other: ToolRegistry) {
        for tool in other.tools.into_values() {
            self.register(tool);
        }
    }

    /// Register a tool. Overwrites any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn QuireTool>) {
        debug!(tool_name = tool.name(), "tool registered");
        let _ = self.tools.insert(tool.name().to_owned(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn QuireTool>> {
        self.tools.get(name).cloned()
    }

    /// Return all tool schemas, sorted by name.
    pub fn definitions(&self) -> Vec<Tool> {
        let mut defs: Vec<Tool> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Return all tool names, sorted alphabetically.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Whether a tool with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Run a tool call with an explicit context.
    pub async fn execute(&self, name: &str, arguments: Value, ctx: &ToolContext) -> ToolResult {
        let Some(tool) = self.get(name) else {
            warn!(tool_name = name, "unknown tool requested");
            return error_result(format!("Error: unknown tool: {name}"));
        };

        debug!(tool_name = name, tool_call_id = %ctx.tool_call_id, "executing tool");
        match tool.execute(arguments, ctx).await {
            Ok(result) => {
                if result.is_error() {
                    debug!(tool_name = name, "tool reported failure");
                }
                result
            }
            Err(e) => {
                warn!(tool_name = name, error = %e, "tool execution failed");
                error_result(format!("Error: {e}"))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolDispatch for ToolRegistry {
    fn definitions(&self) -> Vec<Tool> {
        ToolRegistry::definitions(self)
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> ToolResult {
        let ctx = ToolContext::new(uuid::Uuid::now_v7().to_string());
        self.execute(name, arguments, &ctx).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
