//! # Generation seam
//!
//! The text-generation agent is an external collaborator. The core supplies
//! instructions, a user prompt and a toolset, and consumes the resulting
//! stream of [`GenerationEvent`]s. Tool calls made by the collaborator are
//! routed back through [`ToolDispatch`].

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::events::GenerationEvent;
use crate::tools::{Tool, ToolResult};

/// Boxed stream of [`GenerationEvent`]s returned by [`Generator::generate`].
pub type GenerationStream =
    Pin<Box<dyn Stream<Item = Result<GenerationEvent, GenerationError>> + Send>>;

/// Failures reported by the generation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Connection or timeout failure talking to the model provider.
    #[error("transport error: {message}")]
    Transport {
        /// Error description.
        message: String,
    },

    /// The provider answered with an error.
    #[error("provider error: {message}")]
    Provider {
        /// Error description.
        message: String,
    },

    /// The collaborator stopped after reaching its tool-call limit.
    #[error("tool call limit of {limit} reached")]
    ToolCallLimit {
        /// Configured limit.
        limit: u32,
    },
}

/// One request to the generation collaborator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationRequest {
    /// Full instruction block (system prompt).
    pub instructions: String,
    /// User turn.
    pub prompt: String,
    /// Maximum tool calls the collaborator may make, if limited.
    pub tool_call_limit: Option<u32>,
}

impl GenerationRequest {
    /// Create a request without a tool-call limit.
    pub fn new(instructions: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            prompt: prompt.into(),
            tool_call_limit: None,
        }
    }

    /// Limit the number of tool calls.
    #[must_use]
    pub fn with_tool_call_limit(mut self, limit: u32) -> Self {
        self.tool_call_limit = Some(limit);
        self
    }
}

/// Executes tool calls on behalf of the collaborator.
#[async_trait]
pub trait ToolDispatch: Send + Sync {
    /// Schemas of every tool the collaborator may call.
    fn definitions(&self) -> Vec<Tool>;

    /// Run one tool call. Unknown tools and failures come back as error results.
    async fn dispatch(&self, name: &str, arguments: Value) -> ToolResult;
}

/// A text-generation capability.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Start generating. The returned stream ends when the response is complete.
    async fn generate(
        &self,
        request: GenerationRequest,
        tools: Arc<dyn ToolDispatch>,
    ) -> Result<GenerationStream, GenerationError>;
}

/// Drain a generation stream and return the concatenated response text.
///
/// Tool lifecycle events are logged and otherwise ignored. The first stream
/// error aborts collection.
pub async fn collect_text(mut stream: GenerationStream) -> Result<String, GenerationError> {
    let mut text = String::new();
    while let Some(event) = stream.next().await {
        match event? {
            GenerationEvent::ContentDelta { delta } => text.push_str(&delta),
            GenerationEvent::ToolStarted { name, .. } => {
                tracing::debug!(tool = %name, "collaborator tool call started");
            }
            GenerationEvent::ToolCompleted { name, .. } => {
                tracing::debug!(tool = %name, "collaborator tool call completed");
            }
            GenerationEvent::ToolFailed { name, error, .. } => {
                tracing::warn!(tool = %name, %error, "collaborator tool call failed");
            }
        }
    }
    Ok(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
