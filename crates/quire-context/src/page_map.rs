//! Section title → page number mapping from the compiler's auxiliary file.
//!
//! After the master document compiles, its `.aux` file holds one
//! `\contentsline` per section and subsection. The mapping is regenerated
//! from that file on every read; it is never persisted on its own.

use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

static CONTENTS_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\\contentsline\s*\{(?:section|subsection)\}\{(?:\\numberline\s*\{[^}]*\})?(.+?)\}\{(\d+)\}",
    )
    .unwrap()
});

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+\s*").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Ordered title → page mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageMap {
    entries: IndexMap<String, u32>,
}

impl PageMap {
    /// Whether no entries were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct titles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Page of a cleaned title.
    pub fn get(&self, title: &str) -> Option<u32> {
        self.entries.get(title).copied()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(t, p)| (t.as_str(), *p))
    }

    /// Context section listing every entry, or an empty string when there
    /// are none.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut lines = vec![
            "### Page Map (from last compilation)".to_string(),
            "Use these page numbers with `#page=N` when linking to the PDF.".to_string(),
        ];
        lines.extend(
            self.entries
                .iter()
                .map(|(title, page)| format!("- {title}: page {page}")),
        );
        lines.join("\n")
    }
}

/// Parse auxiliary compiler output into a [`PageMap`].
///
/// A title seen twice keeps its first position and takes the later page.
pub fn parse_page_map(aux: &str) -> PageMap {
    let mut entries = IndexMap::new();
    for caps in CONTENTS_LINE_RE.captures_iter(aux) {
        let title = clean_title(&caps[1]);
        let Ok(page) = caps[2].parse::<u32>() else {
            continue;
        };
        if !title.is_empty() {
            let _ = entries.insert(title, page);
        }
    }
    PageMap { entries }
}

/// Read and parse an auxiliary file. A missing or unreadable file yields an
/// empty map.
pub fn load_page_map(aux_path: &Path) -> PageMap {
    match std::fs::read_to_string(aux_path) {
        Ok(text) => parse_page_map(&text),
        Err(e) => {
            debug!(path = %aux_path.display(), error = %e, "no page map available");
            PageMap::default()
        }
    }
}

/// Strip residual markup from a contents-line title.
///
/// The substitutions run in a fixed order; dashes are handled longest first.
pub fn clean_title(raw: &str) -> String {
    let title = raw.trim();
    let title = COMMAND_RE.replace_all(title, "");
    let title = title
        .replace(r"\&", "&")
        .replace("---", "\u{2014}")
        .replace("--", "\u{2013}")
        .replace(['{', '}', '$'], "");
    WHITESPACE_RE.replace_all(&title, " ").trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
