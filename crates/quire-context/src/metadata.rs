//! Best-effort field extraction from lecture documents.
//!
//! Lecture metadata lives in macro redefinitions near the top of each
//! document:
//!
//! ```text
//! \renewcommand{\lecturenum}{3}
//! \renewcommand{\lecturedate}{February 2, 2026}
//! \renewcommand{\lecturetopic}{Compactness}
//! ```
//!
//! plus one `lecturesummary` environment and any number of `summarybox`
//! environments. Nothing here parses the markup; each field is pulled out by
//! a single pattern and missing fields stay empty.

use std::sync::LazyLock;

use regex::Regex;

/// Marker separating the master preamble from the document body.
pub const DOCUMENT_BODY_MARKER: &str = r"\begin{document}";

static RENEW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\renewcommand\{\\(\w+)\}\{(.+?)\}").unwrap());

static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{lecturesummary\}(.*?)\\end\{lecturesummary\}").unwrap()
});

static SUMMARY_BOX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\begin\{summarybox\}(.*?)\\end\{summarybox\}").unwrap());

/// Fields pulled out of one lecture document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LectureMetadata {
    /// Value of `\lecturenum`.
    pub number: Option<String>,
    /// Value of `\lecturedate`.
    pub date: Option<String>,
    /// Value of `\lecturetopic`.
    pub topic: Option<String>,
    /// Trimmed body of the first `lecturesummary` block, empty if absent.
    pub summary: String,
    /// Trimmed body of every `summarybox` block, in document order.
    pub section_overviews: Vec<String>,
}

impl LectureMetadata {
    /// Lecture number for display, `?` when missing.
    pub fn number_or_placeholder(&self) -> &str {
        self.number.as_deref().unwrap_or("?")
    }

    /// Lecture date for display, `?` when missing.
    pub fn date_or_placeholder(&self) -> &str {
        self.date.as_deref().unwrap_or("?")
    }

    /// Lecture topic for display, `?` when missing.
    pub fn topic_or_placeholder(&self) -> &str {
        self.topic.as_deref().unwrap_or("?")
    }
}

/// Extract metadata from raw lecture text. Never fails.
pub fn extract_metadata(text: &str) -> LectureMetadata {
    let mut meta = LectureMetadata::default();

    // Last occurrence wins.
    for caps in RENEW_RE.captures_iter(text) {
        let value = caps[2].to_string();
        match &caps[1] {
            "lecturenum" => meta.number = Some(value),
            "lecturedate" => meta.date = Some(value),
            "lecturetopic" => meta.topic = Some(value),
            _ => {}
        }
    }

    if let Some(caps) = SUMMARY_RE.captures(text) {
        meta.summary = caps[1].trim().to_string();
    }

    meta.section_overviews = SUMMARY_BOX_RE
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    meta
}

/// Everything before the document-body marker of a master template.
///
/// Returns the whole input when the marker is absent.
pub fn extract_preamble(text: &str) -> &str {
    match text.find(DOCUMENT_BODY_MARKER) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
