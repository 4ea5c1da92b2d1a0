//! Marker splicing for container documents.
//!
//! A container document (the master, the session container) holds a sentinel
//! line such as `% ADD_LECTURE_HERE`. Registering a child inserts its block
//! immediately before the first occurrence of the sentinel, which stays in
//! place for the next registration. Repeated registrations therefore appear
//! in call order.

/// Insert `block` before the first occurrence of `marker`.
///
/// Returns `None` when the marker is absent.
pub fn insert_before_marker(text: &str, marker: &str, block: &str) -> Option<String> {
    let at = text.find(marker)?;
    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..at]);
    out.push_str(block);
    out.push_str(&text[at..]);
    Some(out)
}

/// Include block registering a lecture in the master document.
pub fn lecture_include(number: u32, lecture_id: &str) -> String {
    format!("% Lecture {number}\n\\subfile{{../{lecture_id}/{lecture_id}}}\n\\newpage\n\n")
}

/// Include block registering a session log in the session container.
pub fn session_include(session_id: &str) -> String {
    format!("\\subfile{{{session_id}}}\n\n")
}
