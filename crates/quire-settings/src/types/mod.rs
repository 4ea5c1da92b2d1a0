//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` for the JSON file
//! format. Each type implements [`Default`] with production default values,
//! and `#[serde(default)]` allows partial JSON where missing fields get their
//! default value during deserialization.

mod notebook;
mod services;

pub use notebook::*;
pub use services::*;

use std::path::PathBuf;

use quire_core::WorkspaceLayout;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type for the Quire notebook agent.
///
/// # JSON Format
///
/// ```json
/// {
///   "workspace": { "root": "/srv/classes", "activeClass": "math-104" },
///   "compile": { "timeoutMs": 60000 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuireSettings {
    /// Which notebook to operate on.
    pub workspace: WorkspaceSettings,
    /// Link generation for returned artifacts.
    pub server: ServerSettings,
    /// External typesetting pipeline.
    pub compile: CompileSettings,
    /// Web search used by the fact-check pass.
    pub search: SearchSettings,
    /// Google Drive import tools.
    pub drive: DriveSettings,
    /// Background pass limits.
    pub passes: PassSettings,
    /// Context bundle shaping.
    pub context: ContextSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl QuireSettings {
    /// Directory of the active class workspace (`{root}/{activeClass}`).
    pub fn class_dir(&self) -> Result<PathBuf> {
        let slug = self.workspace.active_class.trim();
        if slug.is_empty() {
            return Err(SettingsError::InvalidValue(
                "workspace.activeClass is not set".into(),
            ));
        }
        if slug.contains(['/', '\\']) || slug == ".." || slug == "." {
            return Err(SettingsError::InvalidValue(format!(
                "workspace.activeClass must be a single directory name, got {slug:?}"
            )));
        }
        Ok(PathBuf::from(&self.workspace.root).join(slug))
    }

    /// Layout of the active class workspace.
    pub fn layout(&self) -> Result<WorkspaceLayout> {
        self.class_dir().map(WorkspaceLayout::new)
    }

    /// Human-readable class name (`math-104` → `math 104`).
    pub fn class_name(&self) -> String {
        self.workspace.active_class.trim().replace('-', " ")
    }

    /// Whether the fact-check pass can run (it needs web search).
    pub fn fact_check_enabled(&self) -> bool {
        self.search
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Whether the Drive import tools are offered.
    pub fn drive_enabled(&self) -> bool {
        self.drive
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
