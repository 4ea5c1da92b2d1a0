//! Pass cursors and change detection.
//!
//! A cursor is the wall-clock time (epoch seconds) captured when the last
//! successful run of a pass started, persisted as `{"last_run": <seconds>}`.
//! A document belongs to the delta set when its modification time is
//! strictly greater than the cursor.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use quire_context::discovery::{all_submission_files, discover_lectures, session_log_paths};
use quire_core::WorkspaceLayout;
use quire_core::workspace::{FACT_CHECK_STATE_FILE, PROGRESS_STATE_FILE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::PassError;

/// The background passes, each with its own cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    /// Fact-check over lectures.
    FactCheck,
    /// Progress narrative over lectures, submissions, and session logs.
    Progress,
}

impl PassKind {
    /// Human-readable name used in logs and messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::FactCheck => "fact-check",
            Self::Progress => "progress",
        }
    }

    /// Path of this pass's cursor file.
    pub fn state_path(self, layout: &WorkspaceLayout) -> PathBuf {
        let file = match self {
            Self::FactCheck => FACT_CHECK_STATE_FILE,
            Self::Progress => PROGRESS_STATE_FILE,
        };
        layout.root().join(file)
    }

    /// Documents this pass watches, in stable order: lectures by number,
    /// then submissions by assignment, then session logs by name.
    pub fn tracked_documents(self, layout: &WorkspaceLayout) -> Vec<PathBuf> {
        let lectures = discover_lectures(layout).into_iter().map(|l| l.path);
        match self {
            Self::FactCheck => lectures.collect(),
            Self::Progress => lectures
                .chain(all_submission_files(layout))
                .chain(session_log_paths(layout))
                .collect(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CursorState {
    #[serde(default)]
    last_run: f64,
}

/// Current wall-clock time as epoch seconds.
pub fn now_seconds() -> f64 {
    to_seconds(Utc::now())
}

/// Load the cursor of `kind`. A missing or unreadable state file reads as 0,
/// which makes every document part of the next delta.
pub fn load_cursor(layout: &WorkspaceLayout, kind: PassKind) -> f64 {
    let path = kind.state_path(layout);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0.0,
        Err(e) => {
            warn!(pass = kind.name(), path = %path.display(), error = %e, "cannot read cursor, starting over");
            return 0.0;
        }
    };
    match serde_json::from_str::<CursorState>(&text) {
        Ok(state) => {
            debug!(pass = kind.name(), last_run = state.last_run, "cursor loaded");
            state.last_run
        }
        Err(e) => {
            warn!(pass = kind.name(), path = %path.display(), error = %e, "malformed cursor, starting over");
            0.0
        }
    }
}

/// Persist the cursor of `kind`.
pub fn save_cursor(layout: &WorkspaceLayout, kind: PassKind, last_run: f64) -> Result<(), PassError> {
    let path = kind.state_path(layout);
    let body = serde_json::to_string_pretty(&CursorState { last_run })?;
    fs::write(&path, body).map_err(|e| PassError::io(&path, e))?;
    debug!(pass = kind.name(), last_run, "cursor saved");
    Ok(())
}

/// Tracked documents of `kind` modified strictly after `cursor`, in the
/// order of [`PassKind::tracked_documents`].
pub fn changed_since(layout: &WorkspaceLayout, kind: PassKind, cursor: f64) -> Vec<PathBuf> {
    kind.tracked_documents(layout)
        .into_iter()
        .filter(|path| modified_seconds(path).is_some_and(|mtime| mtime > cursor))
        .collect()
}

/// Modification time of `path` as epoch seconds.
pub fn modified_seconds(path: &Path) -> Option<f64> {
    let modified: SystemTime = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(to_seconds(DateTime::<Utc>::from(modified)))
}

#[allow(clippy::cast_precision_loss)]
fn to_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1_000_000.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn workspace() -> (tempfile::TempDir, WorkspaceLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(dir.path().join("math-104"));
        write(&layout.lecture_tex("lec10"), "ten");
        write(&layout.lecture_tex("lec02"), "two");
        write(&layout.assignment_dir("hw1").join("submission/hw1.tex"), "sub");
        write(&layout.session_tex("session-2026-02-06"), "session");
        (dir, layout)
    }

    #[test]
    fn cursor_defaults_to_zero() {
        let (_dir, layout) = workspace();
        assert_eq!(load_cursor(&layout, PassKind::FactCheck), 0.0);
    }

    #[test]
    fn cursor_round_trips_per_pass() {
        let (_dir, layout) = workspace();
        save_cursor(&layout, PassKind::Progress, 1_700_000_000.5).unwrap();
        assert_eq!(load_cursor(&layout, PassKind::Progress), 1_700_000_000.5);
        assert_eq!(load_cursor(&layout, PassKind::FactCheck), 0.0);

        let raw = fs::read_to_string(layout.root().join(PROGRESS_STATE_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["last_run"], 1_700_000_000.5);
    }

    #[test]
    fn malformed_cursor_reads_as_zero() {
        let (_dir, layout) = workspace();
        write(&layout.root().join(FACT_CHECK_STATE_FILE), "{not json");
        assert_eq!(load_cursor(&layout, PassKind::FactCheck), 0.0);
    }

    #[test]
    fn zero_cursor_returns_every_document_in_order() {
        let (_dir, layout) = workspace();
        let names: Vec<String> = changed_since(&layout, PassKind::Progress, 0.0)
            .iter()
            .map(|p| layout.relative(p))
            .collect();
        assert_eq!(
            names,
            vec![
                "notes/latex/lec02/lec02.tex",
                "notes/latex/lec10/lec10.tex",
                "hw/hw1/submission/hw1.tex",
                "notes/latex/sessions/session-2026-02-06.tex",
            ]
        );
        assert_eq!(changed_since(&layout, PassKind::FactCheck, 0.0).len(), 2);
    }

    #[test]
    fn cursor_after_every_mtime_yields_nothing() {
        let (_dir, layout) = workspace();
        let latest = PassKind::Progress
            .tracked_documents(&layout)
            .iter()
            .filter_map(|p| modified_seconds(p))
            .fold(0.0_f64, f64::max);
        save_cursor(&layout, PassKind::Progress, latest).unwrap();
        let cursor = load_cursor(&layout, PassKind::Progress);
        assert!(changed_since(&layout, PassKind::Progress, cursor).is_empty());
    }

    #[test]
    fn filter_is_strictly_greater() {
        let (_dir, layout) = workspace();
        let lec02 = layout.lecture_tex("lec02");
        let mtime = modified_seconds(&lec02).unwrap();
        let changed = changed_since(&layout, PassKind::FactCheck, mtime - 1.0);
        assert!(changed.contains(&lec02));
        let changed = changed_since(&layout, PassKind::FactCheck, mtime);
        assert!(!changed.contains(&lec02));
    }
}
