//! Enumerates the documents of a workspace.
//!
//! All listings are deterministic: lectures and assignments sort by their
//! numeric suffix (so `lec10` follows `lec09` and `hw10` follows `hw9`),
//! everything else sorts by name. Missing directories yield empty lists.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use quire_core::WorkspaceLayout;
use quire_core::workspace::lecture_number;
pub use quire_core::workspace::is_plain_name;
use walkdir::WalkDir;

/// A lecture document found on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LectureDoc {
    /// Directory name, e.g. `lec03`.
    pub id: String,
    /// Numeric suffix of the id, when it has one.
    pub number: Option<u32>,
    /// Path to `lecNN/lecNN.tex`.
    pub path: PathBuf,
}

/// Lectures under `notes/latex`, in ascending numeric order.
///
/// A directory counts when its name starts with `lec` and it contains a
/// document of the same name.
pub fn discover_lectures(layout: &WorkspaceLayout) -> Vec<LectureDoc> {
    let mut lectures: Vec<LectureDoc> = dir_entries(&layout.latex_dir())
        .into_iter()
        .filter(|(name, is_dir)| *is_dir && name.starts_with("lec"))
        .filter_map(|(name, _)| {
            let path = layout.lecture_tex(&name);
            path.is_file().then(|| LectureDoc {
                number: lecture_number(&name),
                id: name,
                path,
            })
        })
        .collect();
    lectures.sort_by(|a, b| numbered_order(&a.id, &b.id));
    lectures
}

/// File names of session logs (`session-*.tex`), sorted.
pub fn list_session_logs(layout: &WorkspaceLayout) -> Vec<String> {
    let mut names: Vec<String> = dir_entries(&layout.sessions_dir())
        .into_iter()
        .filter(|(name, is_dir)| {
            !*is_dir && name.starts_with("session-") && name.ends_with(".tex")
        })
        .map(|(name, _)| name)
        .collect();
    names.sort();
    names
}

/// Paths of session logs, in the same order as [`list_session_logs`].
pub fn session_log_paths(layout: &WorkspaceLayout) -> Vec<PathBuf> {
    let dir = layout.sessions_dir();
    list_session_logs(layout)
        .into_iter()
        .map(|name| dir.join(name))
        .collect()
}

/// Assignment directory names (`hw*`), in ascending numeric order.
pub fn list_assignments(layout: &WorkspaceLayout) -> Vec<String> {
    let mut names: Vec<String> = dir_entries(&layout.homework_dir())
        .into_iter()
        .filter(|(name, is_dir)| *is_dir && name.starts_with("hw"))
        .map(|(name, _)| name)
        .collect();
    names.sort_by(|a, b| numbered_order(a, b));
    names
}

/// Submission documents (`hw/<id>/submission/*.tex`), sorted by name.
pub fn submission_files(layout: &WorkspaceLayout, assignment_id: &str) -> Vec<PathBuf> {
    let dir = layout.assignment_dir(assignment_id).join("submission");
    let mut files: Vec<PathBuf> = dir_entries(&dir)
        .into_iter()
        .filter(|(name, is_dir)| !*is_dir && name.ends_with(".tex"))
        .map(|(name, _)| dir.join(name))
        .collect();
    files.sort();
    files
}

/// Explainer documents anywhere under `hw/<id>/explainers`, sorted by path.
pub fn explainer_files(layout: &WorkspaceLayout, assignment_id: &str) -> Vec<PathBuf> {
    let root = layout.assignment_dir(assignment_id).join("explainers");
    if !root.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(&root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tex"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Submission documents of every assignment, assignment order first.
pub fn all_submission_files(layout: &WorkspaceLayout) -> Vec<PathBuf> {
    list_assignments(layout)
        .iter()
        .flat_map(|id| submission_files(layout, id))
        .collect()
}

/// Order names by their trailing number, then lexically.
fn numbered_order(a: &str, b: &str) -> Ordering {
    match (trailing_number(a), trailing_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn trailing_number(name: &str) -> Option<u64> {
    let digits_start = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    name[digits_start..].parse().ok()
}

/// `(name, is_dir)` of the non-hidden entries of `dir`; empty if unreadable.
fn dir_entries(dir: &Path) -> Vec<(String, bool)> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };
    read.filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                return None;
            }
            let is_dir = entry.path().is_dir();
            Some((name, is_dir))
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
