//! Conventional layout of one class notebook on disk.
//!
//! Every component resolves paths through [`WorkspaceLayout`] so the
//! directory contract lives in exactly one place. The layout performs no
//! I/O; it only joins path segments.

use std::path::{Path, PathBuf};

/// Marker line in `master.tex` before which new lectures are registered.
pub const LECTURE_MARKER: &str = "% ADD_LECTURE_HERE";

/// Marker line in `sessions.tex` before which new session logs are registered.
pub const SESSION_MARKER: &str = "% ADD_SESSION_HERE";

/// Name of the top-level compile target.
pub const MASTER_TARGET: &str = "master";

/// Fact-check report file at the workspace root.
pub const FACT_CHECK_REPORT_FILE: &str = "fact-check-report.json";

/// Cursor file of the fact-check pass.
pub const FACT_CHECK_STATE_FILE: &str = ".fact-check-state.json";

/// Cursor file of the progress pass.
pub const PROGRESS_STATE_FILE: &str = ".progress-state.json";

/// Paths inside a single class workspace (`{root}/{slug}`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    /// Wrap a workspace root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Workspace slug (final path component of the root).
    pub fn slug(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `notes/latex`, the parent of every structured document directory.
    pub fn latex_dir(&self) -> PathBuf {
        self.root.join("notes").join("latex")
    }

    /// `notes/latex/{name}/{name}.tex`, the convention shared by every
    /// subfile directory.
    pub fn subfile(&self, name: &str) -> PathBuf {
        self.latex_dir().join(name).join(format!("{name}.tex"))
    }

    /// Master container document.
    pub fn master_tex(&self) -> PathBuf {
        self.subfile(MASTER_TARGET)
    }

    /// Compiler auxiliary output of the master document.
    pub fn master_aux(&self) -> PathBuf {
        self.latex_dir().join(MASTER_TARGET).join("master.aux")
    }

    /// Lecture template.
    pub fn lecture_template(&self) -> PathBuf {
        self.latex_dir().join("temp").join("temp.tex")
    }

    /// Lecture document for a lecture id such as `lec03`.
    pub fn lecture_tex(&self, lecture_id: &str) -> PathBuf {
        self.subfile(lecture_id)
    }

    /// Syllabus overview.
    pub fn syllabus(&self) -> PathBuf {
        self.subfile("syllabus")
    }

    /// Glossary document.
    pub fn glossary(&self) -> PathBuf {
        self.subfile("glossary")
    }

    /// Assignments overview document.
    pub fn assignments_overview(&self) -> PathBuf {
        self.subfile("assignments")
    }

    /// Directory holding session logs and their container.
    pub fn sessions_dir(&self) -> PathBuf {
        self.latex_dir().join("sessions")
    }

    /// Session container document.
    pub fn sessions_container(&self) -> PathBuf {
        self.sessions_dir().join("sessions.tex")
    }

    /// Session log for a session id such as `session-2026-02-06`.
    pub fn session_tex(&self, session_id: &str) -> PathBuf {
        self.sessions_dir().join(format!("{session_id}.tex"))
    }

    /// Progress narrative document.
    pub fn progress_tex(&self) -> PathBuf {
        self.subfile("progress")
    }

    /// Directory holding one subdirectory per assignment.
    pub fn homework_dir(&self) -> PathBuf {
        self.root.join("hw")
    }

    /// Directory of a single assignment such as `hw2`.
    pub fn assignment_dir(&self, assignment_id: &str) -> PathBuf {
        self.homework_dir().join(assignment_id)
    }

    /// Fact-check report.
    pub fn fact_check_report(&self) -> PathBuf {
        self.root.join(FACT_CHECK_REPORT_FILE)
    }

    /// Root-level file name of the compiled master document.
    pub fn master_pdf_name(&self) -> String {
        format!("{}-Notes.pdf", self.slug())
    }

    /// Render `path` relative to the root with `/` separators.
    ///
    /// Paths outside the root are rendered unchanged.
    pub fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Whether `name` is a single plain path component safe to join under the
/// workspace (no separators, not hidden, not `.` or `..`).
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

/// Lecture id for a lecture number (`6` → `lec06`).
pub fn lecture_id(number: u32) -> String {
    format!("lec{number:02}")
}

/// Numeric suffix of a lecture directory name (`lec06` → `6`).
pub fn lecture_number(dir_name: &str) -> Option<u32> {
    dir_name.strip_prefix("lec")?.parse().ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_last_component() {
        let layout = WorkspaceLayout::new("/data/classes/math-104");
        assert_eq!(layout.slug(), "math-104");
        assert_eq!(layout.master_pdf_name(), "math-104-Notes.pdf");
    }

    #[test]
    fn subfile_convention() {
        let layout = WorkspaceLayout::new("/w");
        assert_eq!(
            layout.lecture_tex("lec03"),
            PathBuf::from("/w/notes/latex/lec03/lec03.tex")
        );
        assert_eq!(
            layout.master_tex(),
            PathBuf::from("/w/notes/latex/master/master.tex")
        );
        assert_eq!(
            layout.session_tex("session-2026-02-06"),
            PathBuf::from("/w/notes/latex/sessions/session-2026-02-06.tex")
        );
    }

    #[test]
    fn relative_uses_forward_slashes() {
        let layout = WorkspaceLayout::new("/w");
        let rel = layout.relative(&layout.lecture_tex("lec01"));
        assert_eq!(rel, "notes/latex/lec01/lec01.tex");
    }

    #[test]
    fn plain_names() {
        assert!(is_plain_name("hw2"));
        assert!(is_plain_name("session-2026-02-06"));
        assert!(!is_plain_name("../hw2"));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name(".hidden"));
        assert!(!is_plain_name("a\\b"));
    }

    #[test]
    fn lecture_ids_are_zero_padded() {
        assert_eq!(lecture_id(6), "lec06");
        assert_eq!(lecture_id(12), "lec12");
        assert_eq!(lecture_id(105), "lec105");
    }

    #[test]
    fn lecture_number_parses_suffix() {
        assert_eq!(lecture_number("lec06"), Some(6));
        assert_eq!(lecture_number("lec105"), Some(105));
        assert_eq!(lecture_number("lecture"), None);
        assert_eq!(lecture_number("hw1"), None);
    }
}
