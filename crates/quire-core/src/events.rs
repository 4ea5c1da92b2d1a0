//! Event types for one conversational turn.
//!
//! Two event families:
//!
//! - **[`GenerationEvent`]**: what the generation collaborator reports while it
//!   works (content, tool invocation lifecycle).
//! - **[`ChatEvent`]**: the closed set of events handed to whatever drives the
//!   conversation. Collaborator events are resolved into this type once, at the
//!   boundary, and never forwarded as open maps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum characters of a tool result carried in a [`ChatEvent`].
pub const TOOL_RESULT_DISPLAY_CHARS: usize = 2000;

// ─────────────────────────────────────────────────────────────────────────────
// GenerationEvent: collaborator to core
// ─────────────────────────────────────────────────────────────────────────────

/// Events emitted by the generation collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    /// Incremental response text.
    ContentDelta {
        /// Text fragment.
        delta: String,
    },
    /// A tool invocation began.
    ToolStarted {
        /// Collaborator-assigned call id.
        call_id: String,
        /// Tool name.
        name: String,
        /// Invocation arguments.
        arguments: Value,
    },
    /// A tool invocation finished and produced a result.
    ToolCompleted {
        /// Collaborator-assigned call id.
        call_id: String,
        /// Tool name.
        name: String,
        /// Invocation arguments.
        arguments: Value,
        /// Text the tool returned.
        result: String,
    },
    /// A tool invocation could not be carried out.
    ToolFailed {
        /// Collaborator-assigned call id.
        call_id: String,
        /// Tool name.
        name: String,
        /// Failure description.
        error: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// ChatEvent: core to driver
// ─────────────────────────────────────────────────────────────────────────────

/// Events produced for one conversational turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Progress note for the operator.
    Status {
        /// Status text.
        content: String,
    },
    /// Assistant response text.
    Message {
        /// Text fragment.
        content: String,
    },
    /// A tool call started.
    ToolCallStart {
        /// Call id.
        tool_call_id: String,
        /// Tool name.
        tool_name: String,
        /// Call arguments.
        tool_args: Value,
    },
    /// A tool call completed.
    ToolCallComplete {
        /// Call id.
        tool_call_id: String,
        /// Tool name.
        tool_name: String,
        /// Call arguments.
        tool_args: Value,
        /// Tool output, truncated to [`TOOL_RESULT_DISPLAY_CHARS`].
        result: String,
    },
    /// A tool call failed.
    ToolCallError {
        /// Call id.
        tool_call_id: String,
        /// Tool name.
        tool_name: String,
        /// Failure description.
        error: String,
    },
    /// The turn finished.
    Done,
    /// The turn aborted.
    Error {
        /// Failure description.
        message: String,
    },
}

impl ChatEvent {
    /// Create a status event.
    pub fn status(content: impl Into<String>) -> Self {
        Self::Status {
            content: content.into(),
        }
    }

    /// Whether this event ends the turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error { .. })
    }
}

impl From<GenerationEvent> for ChatEvent {
    fn from(event: GenerationEvent) -> Self {
        match event {
            GenerationEvent::ContentDelta { delta } => Self::Message { content: delta },
            GenerationEvent::ToolStarted {
                call_id,
                name,
                arguments,
            } => Self::ToolCallStart {
                tool_call_id: call_id,
                tool_name: name,
                tool_args: arguments,
            },
            GenerationEvent::ToolCompleted {
                call_id,
                name,
                arguments,
                result,
            } => Self::ToolCallComplete {
                tool_call_id: call_id,
                tool_name: name,
                tool_args: arguments,
                result: truncate_for_display(&result, TOOL_RESULT_DISPLAY_CHARS),
            },
            GenerationEvent::ToolFailed {
                call_id,
                name,
                error,
            } => Self::ToolCallError {
                tool_call_id: call_id,
                tool_name: name,
                error,
            },
        }
    }
}

/// Truncate `text` to `max_chars` characters, appending `...` when cut.
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
