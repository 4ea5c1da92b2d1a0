//! Progress narrative pass.
//!
//! Rewrites `progress.tex` from every session log plus the documents edited
//! since the last update. The collaborator gets no tools; its whole answer is
//! the new document.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use quire_context::discovery::session_log_paths;
use quire_core::WorkspaceLayout;
use quire_core::generation::{GenerationRequest, Generator, collect_text};
use quire_tools::ToolRegistry;
use regex::Regex;
use tracing::{error, info, warn};

use crate::errors::PassError;
use crate::outcome::PassOutcome;
use crate::state::{PassKind, changed_since, load_cursor, now_seconds, save_cursor};

const INSTRUCTIONS: &str = include_str!("prompts/progress.md");

/// Body text of the placeholder narrative shipped with new notebooks.
const PLACEHOLDER_TEXT: &str = "No sessions recorded yet";

const SUBFILE_HEADER: &str = "\\documentclass[../master/master.tex]{subfiles}";

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:latex|tex)?\s*\n").unwrap());
static TRAILING_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n```\s*$").unwrap());
static DOCUMENT_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\begin\{document\}(.*?)\\end\{document\}").unwrap());

/// The progress pass over one workspace.
pub struct ProgressPass {
    layout: WorkspaceLayout,
    generator: Arc<dyn Generator>,
    class_name: String,
}

impl ProgressPass {
    /// Create a pass.
    pub fn new(
        layout: WorkspaceLayout,
        generator: Arc<dyn Generator>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            generator,
            class_name: class_name.into(),
        }
    }

    /// Documents changed since the last successful run.
    pub fn pending(&self) -> Vec<PathBuf> {
        let cursor = load_cursor(&self.layout, PassKind::Progress);
        changed_since(&self.layout, PassKind::Progress, cursor)
    }

    /// Run once. Failures are logged and rendered, never propagated.
    pub async fn run(&self) -> PassOutcome {
        let started = now_seconds();
        let sessions = session_log_paths(&self.layout);
        if sessions.is_empty() {
            info!(pass = "progress", "skipped, no sessions exist yet");
            return PassOutcome::Skipped {
                reason: "No sessions to synthesize.".into(),
            };
        }

        let changed = self.pending();
        if changed.is_empty() {
            info!(pass = "progress", "skipped, nothing changed since last update");
            return PassOutcome::Skipped {
                reason: "No notebook files changed since last progress update.".into(),
            };
        }

        info!(pass = "progress", changed = changed.len(), sessions = sessions.len(), "pass started");
        match self.update(&sessions, &changed, started).await {
            Ok(document) => {
                info!(
                    pass = "progress",
                    sessions_read = sessions.len(),
                    changed = changed.len(),
                    output_size = document.len(),
                    "pass complete"
                );
                PassOutcome::Completed {
                    documents: changed.len(),
                    output: document,
                }
            }
            Err(e) => {
                error!(pass = "progress", error = %e, "pass failed");
                PassOutcome::Failed {
                    message: format!("Progress update failed: {e}"),
                }
            }
        }
    }

    async fn update(
        &self,
        sessions: &[PathBuf],
        changed: &[PathBuf],
        started: f64,
    ) -> Result<String, PassError> {
        let progress_path = self.layout.progress_tex();
        let current = match tokio::fs::read_to_string(&progress_path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "(no progress document yet)".to_string()
            }
            Err(e) => return Err(PassError::io(&progress_path, e)),
        };

        let mut session_blocks = Vec::with_capacity(sessions.len());
        for path in sessions {
            let text = self.read(path).await?;
            session_blocks.push(format!(
                "--- SESSION: {} ---\n{text}\n--- END ---",
                self.layout.relative(path)
            ));
        }

        let mut edited_blocks = Vec::new();
        for path in changed.iter().filter(|p| !sessions.contains(p)) {
            let text = self.read(path).await?;
            edited_blocks.push(format!(
                "--- EDITED: {} ---\n{text}\n--- END ---",
                self.layout.relative(path)
            ));
        }

        let mut prompt = vec![
            "Update the student progress document based on all available information.\n".to_string(),
            format!("## Current progress.tex\n```latex\n{current}\n```\n"),
            format!("## All Session Summaries\n{}\n", session_blocks.join("\n\n")),
        ];
        if !edited_blocks.is_empty() {
            prompt.push(format!(
                "## Files Edited This Session\n{}\n",
                edited_blocks.join("\n\n")
            ));
        }

        let instructions = INSTRUCTIONS.replace("{className}", &self.class_name);
        let request = GenerationRequest::new(instructions, prompt.join("\n")).with_tool_call_limit(0);
        let stream = self
            .generator
            .generate(request, Arc::new(ToolRegistry::new()))
            .await?;
        let raw = collect_text(stream).await?;
        if raw.trim().is_empty() {
            warn!(pass = "progress", "empty response");
            return Err(PassError::EmptyOutput { pass: "progress" });
        }

        let document = normalize_progress(&raw);
        if let Some(parent) = progress_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PassError::io(parent, e))?;
        }
        tokio::fs::write(&progress_path, &document)
            .await
            .map_err(|e| PassError::io(&progress_path, e))?;

        save_cursor(&self.layout, PassKind::Progress, started)?;
        Ok(document)
    }

    async fn read(&self, path: &Path) -> Result<String, PassError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PassError::io(path, e))
    }
}

/// Turn the collaborator's answer into a compilable subfile: strip code
/// fences, add the subfile wrapper when absent, close the document when the
/// answer was cut short.
pub fn normalize_progress(raw: &str) -> String {
    let unfenced = LEADING_FENCE.replace(raw.trim(), "");
    let mut text = TRAILING_FENCE.replace(unfenced.trim(), "").into_owned();

    if !text.contains("\\documentclass") {
        text = format!("{SUBFILE_HEADER}\n\n\\begin{{document}}\n\n{text}\n\n\\end{{document}}\n");
    }
    if !text.contains("\\end{document}") {
        warn!(pass = "progress", "answer missing \\end{{document}}, appending");
        text.push_str("\n\n\\end{document}\n");
    }
    text
}

/// The progress narrative for the conversational context, or `None` when
/// there is no document or it still holds the placeholder.
pub fn load_progress(layout: &WorkspaceLayout) -> Option<String> {
    let text = std::fs::read_to_string(layout.progress_tex()).ok()?;
    let body = DOCUMENT_BODY.captures(&text)?.get(1)?.as_str().trim();
    (!body.is_empty() && !body.contains(PLACEHOLDER_TEXT))
        .then(|| format!("### Student Progress (auto-maintained)\n\n{body}"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
