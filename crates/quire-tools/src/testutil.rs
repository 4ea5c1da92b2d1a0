//! Shared fixtures for tool tests.

use std::fs;
use std::path::Path;

use quire_core::WorkspaceLayout;
use quire_core::tools::ToolResult;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::notebook::Notebook;
use crate::traits::ToolContext;

pub const TEMPLATE: &str = r"% LECTURE X: Topic
% Date: January 1, 2026
\documentclass[../master/master.tex]{subfiles}
\renewcommand{\lecturenum}{X}
\renewcommand{\lecturedate}{January 1, 2026}
\renewcommand{\lecturetopic}{Topic}
\begin{document}
\section{Lecture \lecturenum: \lecturetopic}
\end{document}
";

pub const MASTER: &str = r"\documentclass{book}
\usepackage{subfiles}
\begin{document}
\tableofcontents
% ADD_LECTURE_HERE
\end{document}
";

pub const SESSIONS: &str = r"\documentclass[../master/master.tex]{subfiles}
\begin{document}
\section{Sessions}
% ADD_SESSION_HERE
\end{document}
";

pub fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// A workspace named `math-104` with template, master and session container.
pub fn layout_fixture() -> (TempDir, WorkspaceLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = WorkspaceLayout::new(dir.path().join("math-104"));
    write(&layout.lecture_template(), TEMPLATE);
    write(&layout.master_tex(), MASTER);
    write(&layout.sessions_container(), SESSIONS);
    (dir, layout)
}

/// [`layout_fixture`] wrapped in a [`Notebook`]. The notebook root is the
/// returned directory's `math-104` child.
pub fn notebook_fixture() -> (TempWorkspace, Notebook) {
    let (dir, layout) = layout_fixture();
    let root = layout.root().to_path_buf();
    (TempWorkspace { _dir: dir, root }, Notebook::new(layout))
}

/// Keeps the temporary directory alive and exposes the workspace root.
pub struct TempWorkspace {
    _dir: TempDir,
    root: std::path::PathBuf,
}

impl TempWorkspace {
    pub fn path(&self) -> &Path {
        &self.root
    }
}

pub fn make_ctx() -> ToolContext {
    ToolContext {
        tool_call_id: "call-1".into(),
        cancellation: CancellationToken::new(),
    }
}

pub fn text(result: &ToolResult) -> &str {
    &result.content
}
