//! Mode-specific context bundle.
//!
//! [`build_context`] is a pure function of workspace state and mode: it only
//! reads, caches nothing, and produces the same text for the same files.
//! Each section is included only when its source exists and is non-empty;
//! sections are joined with a blank line and the page map always comes last.

use std::fs;
use std::path::Path;

use quire_core::{Mode, WorkspaceLayout};
use tracing::debug;

use crate::discovery::{
    LectureDoc, discover_lectures, explainer_files, is_plain_name, list_assignments,
    list_session_logs, submission_files,
};
use crate::metadata::{LectureMetadata, extract_metadata, extract_preamble};
use crate::page_map::load_page_map;

/// Knobs for [`build_context`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextOptions {
    /// Assignment to focus on in work mode (e.g. `hw2`).
    pub assignment_id: Option<String>,
    /// Number of most recent lectures included in full in lecture mode.
    pub recent_lecture_count: usize,
    /// Maximum characters per section-overview excerpt.
    pub overview_excerpt_chars: usize,
    /// Pre-rendered sections appended after the mode sections and before the
    /// page map (progress narrative, fact-check digest).
    pub extra_sections: Vec<String>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            assignment_id: None,
            recent_lecture_count: 2,
            overview_excerpt_chars: 200,
            extra_sections: Vec::new(),
        }
    }
}

impl ContextOptions {
    /// Focus work mode on one assignment.
    #[must_use]
    pub fn with_assignment(mut self, assignment_id: impl Into<String>) -> Self {
        self.assignment_id = Some(assignment_id.into());
        self
    }
}

/// A discovered lecture with its extracted metadata.
struct Lecture {
    doc: LectureDoc,
    meta: LectureMetadata,
}

/// Build the context bundle for `mode`.
pub fn build_context(layout: &WorkspaceLayout, mode: Mode, options: &ContextOptions) -> String {
    let lectures = load_lectures(layout);
    let mut parts: Vec<String> = Vec::new();

    match mode {
        Mode::Lecture => lecture_sections(layout, &lectures, options, &mut parts),
        Mode::Review => review_sections(layout, &lectures, options, &mut parts),
        Mode::Work => work_sections(layout, &lectures, options, &mut parts),
        Mode::Done => done_sections(layout, &lectures, &mut parts),
        Mode::Default => default_sections(layout, &lectures, &mut parts),
    }

    parts.extend(
        options
            .extra_sections
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned(),
    );

    let page_map = load_page_map(&layout.master_aux()).render();
    if !page_map.is_empty() {
        parts.push(page_map);
    }

    debug!(mode = %mode, sections = parts.len(), "context assembled");
    parts.join("\n\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-mode composition
// ─────────────────────────────────────────────────────────────────────────────

fn lecture_sections(
    layout: &WorkspaceLayout,
    lectures: &[Lecture],
    options: &ContextOptions,
    parts: &mut Vec<String>,
) {
    if let Some(master) = read_nonempty(&layout.master_tex()) {
        let preamble = extract_preamble(&master);
        if !preamble.trim().is_empty() {
            parts.push(fenced("### LaTeX Preamble (available commands)", preamble));
        }
    }

    if let Some(template) = read_nonempty(&layout.lecture_template()) {
        parts.push(fenced("### Lecture Template (temp.tex)", &template));
    }

    let skip = lectures.len().saturating_sub(options.recent_lecture_count);
    for lecture in &lectures[skip..] {
        if let Some(content) = read_nonempty(&lecture.doc.path) {
            parts.push(fenced(
                &format!("### Full content: {}", lecture.doc.id),
                &content,
            ));
        }
    }

    push_some(parts, lecture_index(lectures));
    push_document(parts, "### Syllabus", &layout.syllabus());
}

fn review_sections(
    layout: &WorkspaceLayout,
    lectures: &[Lecture],
    options: &ContextOptions,
    parts: &mut Vec<String>,
) {
    push_some(parts, lecture_summaries(lectures));
    push_some(
        parts,
        section_overviews(lectures, options.overview_excerpt_chars),
    );
    push_document(parts, "### Glossary", &layout.glossary());
}

fn work_sections(
    layout: &WorkspaceLayout,
    lectures: &[Lecture],
    options: &ContextOptions,
    parts: &mut Vec<String>,
) {
    match options.assignment_id.as_deref() {
        Some(id) => assignment_sections(layout, id, parts),
        None => {
            let listing = assignment_listing(layout)
                .unwrap_or_else(|| "No homework directories exist yet.".to_string());
            parts.push(format!(
                "No homework specified. Available homework directories:\n\n{listing}"
            ));
        }
    }

    push_document(parts, "### Assignments Overview", &layout.assignments_overview());
    push_some(parts, lecture_summaries(lectures));
}

fn assignment_sections(layout: &WorkspaceLayout, id: &str, parts: &mut Vec<String>) {
    let assignment = is_plain_name(id)
        .then(|| read_nonempty(&layout.assignment_dir(id).join("assignment.txt")))
        .flatten();
    match assignment {
        Some(text) => parts.push(format!("### Assignment ({id})\n{text}")),
        None => {
            parts.push(format!(
                "### Assignment ({id})\nNo assignment.txt found for {id}."
            ));
            if !is_plain_name(id) {
                return;
            }
        }
    }

    for path in submission_files(layout, id) {
        if let Some(content) = read_nonempty(&path) {
            parts.push(fenced(
                &format!("### Current submission: {}", file_name(&path)),
                &content,
            ));
        }
    }

    let explainers_root = layout.assignment_dir(id).join("explainers");
    for path in explainer_files(layout, id) {
        if let Some(content) = read_nonempty(&path) {
            let label = WorkspaceLayout::new(&explainers_root).relative(&path);
            parts.push(fenced(&format!("### Explainer: {label}"), &content));
        }
    }
}

fn done_sections(layout: &WorkspaceLayout, lectures: &[Lecture], parts: &mut Vec<String>) {
    push_some(parts, lecture_index(lectures));
    push_some(parts, session_listing(layout));
    push_document(parts, "### sessions.tex", &layout.sessions_container());
}

fn default_sections(layout: &WorkspaceLayout, lectures: &[Lecture], parts: &mut Vec<String>) {
    push_document(parts, "### Syllabus", &layout.syllabus());
    push_some(parts, lecture_summaries(lectures));
    push_some(parts, assignment_listing(layout));
    push_some(parts, session_listing(layout));
}

// ─────────────────────────────────────────────────────────────────────────────
// Section renderers
// ─────────────────────────────────────────────────────────────────────────────

/// One line per lecture: `- Lecture N (DATE): TOPIC`.
fn lecture_index(lectures: &[Lecture]) -> Option<String> {
    if lectures.is_empty() {
        return None;
    }
    let mut lines = vec!["### Lecture Index".to_string()];
    lines.extend(lectures.iter().map(|l| {
        format!(
            "- Lecture {} ({}): {}",
            l.meta.number_or_placeholder(),
            l.meta.date_or_placeholder(),
            l.meta.topic_or_placeholder()
        )
    }));
    Some(lines.join("\n"))
}

fn lecture_summaries(lectures: &[Lecture]) -> Option<String> {
    if lectures.is_empty() {
        return None;
    }
    let mut lines = vec!["### Lecture Summaries".to_string()];
    for l in lectures {
        lines.push(format!(
            "\n**Lecture {}: {}**",
            l.meta.number_or_placeholder(),
            l.meta.topic_or_placeholder()
        ));
        if l.meta.summary.is_empty() {
            lines.push("(no summary available)".to_string());
        } else {
            lines.push(l.meta.summary.clone());
        }
    }
    Some(lines.join("\n"))
}

fn section_overviews(lectures: &[Lecture], excerpt_chars: usize) -> Option<String> {
    let mut lines = vec!["### Section Summaries".to_string()];
    for l in lectures.iter().filter(|l| !l.meta.section_overviews.is_empty()) {
        lines.push(format!(
            "\n**Lecture {} sections:**",
            l.meta.number_or_placeholder()
        ));
        lines.extend(
            l.meta
                .section_overviews
                .iter()
                .map(|b| format!("- {}", excerpt(b, excerpt_chars))),
        );
    }
    (lines.len() > 1).then(|| lines.join("\n"))
}

fn assignment_listing(layout: &WorkspaceLayout) -> Option<String> {
    let dirs = list_assignments(layout);
    if dirs.is_empty() {
        return None;
    }
    let mut lines = vec!["### Homework Directories".to_string()];
    lines.extend(dirs.iter().map(|d| format!("- {d}/")));
    Some(lines.join("\n"))
}

fn session_listing(layout: &WorkspaceLayout) -> Option<String> {
    let files = list_session_logs(layout);
    if files.is_empty() {
        return None;
    }
    let mut lines = vec!["### Existing Sessions".to_string()];
    lines.extend(files.iter().map(|f| format!("- {f}")));
    Some(lines.join("\n"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn load_lectures(layout: &WorkspaceLayout) -> Vec<Lecture> {
    discover_lectures(layout)
        .into_iter()
        .map(|doc| {
            let meta = read_text(&doc.path)
                .map(|t| extract_metadata(&t))
                .unwrap_or_default();
            Lecture { doc, meta }
        })
        .collect()
}

fn read_text(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// File content when it exists and is not blank.
fn read_nonempty(path: &Path) -> Option<String> {
    read_text(path).filter(|t| !t.trim().is_empty())
}

fn push_some(parts: &mut Vec<String>, section: Option<String>) {
    if let Some(section) = section {
        parts.push(section);
    }
}

fn push_document(parts: &mut Vec<String>, header: &str, path: &Path) {
    if let Some(content) = read_nonempty(path) {
        parts.push(fenced(header, &content));
    }
}

fn fenced(header: &str, body: &str) -> String {
    format!("{header}\n```latex\n{body}\n```")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// First `max_chars` characters of `text`.
fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
