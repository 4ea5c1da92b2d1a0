//! Lecture template filling.
//!
//! The template carries literal placeholder strings. Each is replaced by
//! exact-text substitution; a placeholder that no longer appears in the
//! template is left unfilled and logged.

use tracing::warn;

/// Literal placeholders in the lecture template.
pub mod placeholders {
    /// Lecture number macro.
    pub const NUMBER: &str = r"\renewcommand{\lecturenum}{X}";
    /// Lecture date macro.
    pub const DATE: &str = r"\renewcommand{\lecturedate}{January 1, 2026}";
    /// Lecture topic macro.
    pub const TOPIC: &str = r"\renewcommand{\lecturetopic}{Topic}";
    /// Header comment naming the lecture.
    pub const HEADER: &str = "% LECTURE X: Topic";
    /// Header comment with the date.
    pub const HEADER_DATE: &str = "% Date: January 1, 2026";
}

/// Fill the lecture template. Returns the filled text and the placeholders
/// that were not found.
pub fn fill_lecture_template(
    template: &str,
    number: u32,
    date: &str,
    topic: &str,
) -> (String, Vec<&'static str>) {
    let substitutions = [
        (
            placeholders::NUMBER,
            format!("\\renewcommand{{\\lecturenum}}{{{number}}}"),
        ),
        (
            placeholders::DATE,
            format!("\\renewcommand{{\\lecturedate}}{{{date}}}"),
        ),
        (
            placeholders::TOPIC,
            format!("\\renewcommand{{\\lecturetopic}}{{{topic}}}"),
        ),
        (placeholders::HEADER, format!("% LECTURE {number}: {topic}")),
        (placeholders::HEADER_DATE, format!("% Date: {date}")),
    ];

    let mut text = template.to_string();
    let mut missing = Vec::new();
    for (placeholder, value) in substitutions {
        if text.contains(placeholder) {
            text = text.replace(placeholder, &value);
        } else {
            missing.push(placeholder);
        }
    }

    if !missing.is_empty() {
        warn!(?missing, "lecture template placeholders not found");
    }
    (text, missing)
}
