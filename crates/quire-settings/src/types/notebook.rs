//! Workspace selection, context shaping, and background pass settings.

use serde::{Deserialize, Serialize};

/// Which notebook the agent operates on.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceSettings {
    /// Directory holding one subdirectory per class.
    pub root: String,
    /// Slug of the active class.
    pub active_class: String,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            root: "classes".to_string(),
            active_class: String::new(),
        }
    }
}

/// How the context bundle is shaped.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextSettings {
    /// Number of most recent lectures included in full in lecture mode.
    pub recent_lecture_count: usize,
    /// Maximum characters per section-overview excerpt in review mode.
    pub overview_excerpt_chars: usize,
    /// Append the progress narrative to every context bundle.
    pub include_progress: bool,
    /// Append the fact-check digest to every context bundle.
    pub include_fact_check: bool,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            recent_lecture_count: 2,
            overview_excerpt_chars: 200,
            include_progress: false,
            include_fact_check: false,
        }
    }
}

/// Background pass limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassSettings {
    /// Maximum search calls the fact-check collaborator may make per pass.
    pub fact_check_tool_call_limit: u32,
}

impl Default for PassSettings {
    fn default() -> Self {
        Self {
            fact_check_tool_call_limit: 30,
        }
    }
}
