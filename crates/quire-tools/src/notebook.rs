//! Sandboxed notebook operations.
//!
//! Every path goes through [`Sandbox::resolve`] first; a rejected path
//! performs no I/O. Creation operations never overwrite: a duplicate id
//! fails and leaves the existing document untouched.

use std::fmt;
use std::io;
use std::path::Path;

use quire_core::WorkspaceLayout;
use quire_core::workspace::{LECTURE_MARKER, SESSION_MARKER, is_plain_name, lecture_id};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::errors::NotebookError;
use crate::sandbox::Sandbox;
use crate::splice::{insert_before_marker, lecture_include, session_include};
use crate::template::fill_lecture_template;

/// Kind of a listed entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory).
    File,
    /// Directory.
    Directory,
}

/// One entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    /// Entry name.
    pub name: String,
    /// File or directory.
    pub kind: EntryKind,
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            EntryKind::File => 'f',
            EntryKind::Directory => 'd',
        };
        write!(f, "{tag} {}", self.name)
    }
}

/// Outcome of registering a new document in its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// Include block inserted before the marker.
    Registered,
    /// Container exists but has no marker.
    MarkerMissing,
    /// Container document does not exist.
    NoContainer,
}

/// A newly created document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Created {
    /// Document id (`lec06`, `session-2026-02-06`).
    pub id: String,
    /// Path relative to the workspace root.
    pub path: String,
    /// Whether the container was updated.
    pub registration: Registration,
}

/// Input for [`Notebook::create_session`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionLog {
    /// Session date, used in the file name (`YYYY-MM-DD`).
    pub date: String,
    /// Primary activity of the session.
    pub mode: String,
    /// One-sentence summary.
    pub summary: String,
    /// Comma-separated topics.
    pub topics: String,
    /// Accomplishments, one per line.
    pub covered: String,
    /// Suggested next steps, one per line.
    pub next_steps: String,
}

/// Notebook operations over one workspace.
#[derive(Clone, Debug)]
pub struct Notebook {
    layout: WorkspaceLayout,
    sandbox: Sandbox,
}

impl Notebook {
    /// Create operations rooted at the layout's workspace.
    pub fn new(layout: WorkspaceLayout) -> Self {
        let sandbox = Sandbox::new(layout.root());
        Self { layout, sandbox }
    }

    /// Workspace layout.
    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Full text of a file.
    pub async fn read(&self, relative: &str) -> Result<String, NotebookError> {
        let path = self.sandbox.resolve(relative)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| NotebookError::io(relative, e))
    }

    /// Create or overwrite a file, creating parent directories. Returns the
    /// number of characters written.
    pub async fn write(&self, relative: &str, content: &str) -> Result<usize, NotebookError> {
        let path = self.sandbox.resolve(relative)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| NotebookError::io(relative, e))?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| NotebookError::io(relative, e))?;
        debug!(path = relative, bytes = content.len(), "notebook file written");
        Ok(content.chars().count())
    }

    /// Non-hidden entries of a directory, sorted by name.
    pub async fn list(&self, relative: &str) -> Result<Vec<ListEntry>, NotebookError> {
        let path = self.sandbox.resolve(relative)?;
        if !tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            return Err(NotebookError::NotADirectory {
                path: relative.to_string(),
            });
        }

        let mut read = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| NotebookError::io(relative, e))?;
        let mut entries = Vec::new();
        while let Some(entry) = read
            .next_entry()
            .await
            .map_err(|e| NotebookError::io(relative, e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let kind = if tokio::fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir()) {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(ListEntry { name, kind });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Create lecture `number` from the template and register it in the
    /// master document.
    pub async fn create_lecture(
        &self,
        number: u32,
        date: &str,
        topic: &str,
    ) -> Result<Created, NotebookError> {
        let id = lecture_id(number);
        let path = self.layout.lecture_tex(&id);
        let rel = self.layout.relative(&path);
        if path.exists() {
            return Err(NotebookError::AlreadyExists { id });
        }

        let template_path = self.layout.lecture_template();
        let template = match tokio::fs::read_to_string(&template_path).await {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(NotebookError::TemplateMissing {
                    path: self.layout.relative(&template_path),
                });
            }
            Err(e) => return Err(NotebookError::io(self.layout.relative(&template_path), e)),
        };

        let (content, _missing) = fill_lecture_template(&template, number, date, topic);
        create_new(&path, &content, &rel, &id).await?;

        let registration = self
            .register(&self.layout.master_tex(), LECTURE_MARKER, &lecture_include(number, &id))
            .await?;
        info!(lecture = %id, ?registration, "lecture created");
        Ok(Created {
            id,
            path: rel,
            registration,
        })
    }

    /// Create a session log and register it in the session container.
    pub async fn create_session(&self, log: &SessionLog) -> Result<Created, NotebookError> {
        let date = log.date.trim();
        if !is_plain_name(date) {
            return Err(NotebookError::InvalidArgument {
                message: format!("invalid session date: {:?} (use YYYY-MM-DD)", log.date),
            });
        }

        let id = format!("session-{date}");
        let path = self.layout.session_tex(&id);
        let rel = self.layout.relative(&path);
        if path.exists() {
            return Err(NotebookError::AlreadyExists {
                id: format!("{id}.tex"),
            });
        }

        create_new(&path, &render_session(date, log), &rel, &format!("{id}.tex")).await?;

        let registration = self
            .register(&self.layout.sessions_container(), SESSION_MARKER, &session_include(&id))
            .await?;
        info!(session = %id, ?registration, "session log created");
        Ok(Created {
            id,
            path: rel,
            registration,
        })
    }

    /// Splice `block` into `container` before `marker`.
    async fn register(
        &self,
        container: &Path,
        marker: &str,
        block: &str,
    ) -> Result<Registration, NotebookError> {
        let rel = self.layout.relative(container);
        let text = match tokio::fs::read_to_string(container).await {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(container = %rel, "container document missing, not registered");
                return Ok(Registration::NoContainer);
            }
            Err(e) => return Err(NotebookError::io(rel, e)),
        };

        let Some(updated) = insert_before_marker(&text, marker, block) else {
            warn!(container = %rel, marker, "marker missing, not registered");
            return Ok(Registration::MarkerMissing);
        };
        tokio::fs::write(container, updated)
            .await
            .map_err(|e| NotebookError::io(rel, e))?;
        Ok(Registration::Registered)
    }
}

/// Write a file that must not already exist.
async fn create_new(path: &Path, content: &str, rel: &str, id: &str) -> Result<(), NotebookError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| NotebookError::io(rel, e))?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => NotebookError::AlreadyExists { id: id.to_string() },
            _ => NotebookError::io(rel, e),
        })?;
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| NotebookError::io(rel, e))?;
    file.flush().await.map_err(|e| NotebookError::io(rel, e))
}

/// `\item` lines for each non-blank input line.
fn item_lines(text: &str) -> String {
    let items: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("    \\item {l}"))
        .collect();
    if items.is_empty() {
        "    \\item (none)".to_string()
    } else {
        items.join("\n")
    }
}

fn render_session(date: &str, log: &SessionLog) -> String {
    let mode = log.mode.trim();
    let summary = log.summary.trim();
    let topics = log.topics.trim();
    let covered = item_lines(&log.covered);
    let next = item_lines(&log.next_steps);
    format!(
        r"\documentclass[../master/master.tex]{{subfiles}}

\begin{{document}}

\subsection{{{date} --- {mode} Session}}

\begin{{summarybox}}
\textbf{{Session Summary:}} {summary} \\
\textbf{{Date:}} {date} \\
\textbf{{Mode:}} {mode} \\
\textbf{{Topics:}} {topics}
\end{{summarybox}}

\textbf{{What we covered:}}
\begin{{itemize}}[nosep]
{covered}
\end{{itemize}}

\textbf{{Next steps:}}
\begin{{itemize}}[nosep]
{next}
\end{{itemize}}

\end{{document}}
"
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
