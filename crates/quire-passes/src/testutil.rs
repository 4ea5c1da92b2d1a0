//! Shared fixtures for pass tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use quire_core::WorkspaceLayout;
use quire_core::events::GenerationEvent;
use quire_core::generation::{
    GenerationError, GenerationRequest, GenerationStream, Generator, ToolDispatch,
};
use tempfile::TempDir;

mockall::mock! {
    pub Gen {}

    #[async_trait::async_trait]
    impl Generator for Gen {
        async fn generate(
            &self,
            request: GenerationRequest,
            tools: Arc<dyn ToolDispatch>,
        ) -> Result<GenerationStream, GenerationError>;
    }
}

pub fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// Two lectures, one submission, one session log.
pub fn workspace() -> (TempDir, WorkspaceLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = WorkspaceLayout::new(dir.path().join("math-104"));
    write(
        &layout.lecture_tex("lec01"),
        "Cantor introduced the diagonal argument in 1891.",
    );
    write(&layout.lecture_tex("lec02"), "Heine-Borel.");
    write(
        &layout.assignment_dir("hw1").join("submission/hw1.tex"),
        "\\begin{proof}ok\\end{proof}",
    );
    write(
        &layout.session_tex("session-2026-02-06"),
        "\\textbf{Session Summary:} compactness",
    );
    (dir, layout)
}

/// A stream that yields `text` in two deltas.
pub fn text_stream(text: &str) -> GenerationStream {
    let mid = text.char_indices().nth(text.chars().count() / 2).map_or(0, |(i, _)| i);
    let events = vec![
        Ok(GenerationEvent::ContentDelta {
            delta: text[..mid].to_string(),
        }),
        Ok(GenerationEvent::ContentDelta {
            delta: text[mid..].to_string(),
        }),
    ];
    Box::pin(futures::stream::iter(events))
}

/// A stream that fails after some output.
pub fn failing_stream() -> GenerationStream {
    Box::pin(futures::stream::iter(vec![
        Ok(GenerationEvent::ContentDelta {
            delta: "[".into(),
        }),
        Err(GenerationError::Transport {
            message: "connection reset".into(),
        }),
    ]))
}
