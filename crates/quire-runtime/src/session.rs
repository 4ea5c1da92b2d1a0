//! Turn execution.

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use quire_context::{ContextOptions, PromptParams, assignment_id, build_context, build_instructions, detect_mode};
use quire_core::generation::{GenerationRequest, Generator, ToolDispatch};
use quire_core::{ChatEvent, Mode, WorkspaceLayout};
use quire_passes::{load_fact_check_report, load_progress};
use quire_settings::QuireSettings;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::background::{BackgroundPasses, PassHandle, announcement, prune_finished};
use crate::messages::{ChatMessage, build_prompt, split_latest};

/// Stream of events for one turn.
pub type ChatEventStream = Pin<Box<dyn Stream<Item = ChatEvent> + Send>>;

/// Per-session knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    /// Values substituted into the base instructions.
    pub prompt: PromptParams,
    /// Lectures included in full in lecture mode.
    pub recent_lecture_count: usize,
    /// Characters per section-overview excerpt.
    pub overview_excerpt_chars: usize,
    /// Append the progress narrative to the context.
    pub include_progress: bool,
    /// Append the fact-check digest to the context.
    pub include_fact_check: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        let context = ContextOptions::default();
        Self {
            prompt: PromptParams::default(),
            recent_lecture_count: context.recent_lecture_count,
            overview_excerpt_chars: context.overview_excerpt_chars,
            include_progress: false,
            include_fact_check: false,
        }
    }
}

impl SessionOptions {
    /// Options from loaded settings.
    pub fn from_settings(settings: &QuireSettings) -> Self {
        Self {
            prompt: PromptParams {
                class_name: settings.class_name(),
                backend_url: settings.server.backend_url.clone(),
                class_slug: settings.workspace.active_class.trim().to_string(),
            },
            recent_lecture_count: settings.context.recent_lecture_count,
            overview_excerpt_chars: settings.context.overview_excerpt_chars,
            include_progress: settings.context.include_progress,
            include_fact_check: settings.context.include_fact_check,
        }
    }
}

struct Inner {
    layout: WorkspaceLayout,
    generator: Arc<dyn Generator>,
    tools: Arc<dyn ToolDispatch>,
    options: SessionOptions,
    background: BackgroundPasses,
    pending: Mutex<Vec<PassHandle>>,
}

/// Everything needed to run turns against one workspace.
///
/// Cheap to clone; clones share the pending background handles.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Create a session without background passes.
    pub fn new(
        layout: WorkspaceLayout,
        generator: Arc<dyn Generator>,
        tools: Arc<dyn ToolDispatch>,
        options: SessionOptions,
    ) -> Self {
        Self::with_background(layout, generator, tools, options, BackgroundPasses::new())
    }

    /// Create a session whose wrap-up turns spawn `background`.
    pub fn with_background(
        layout: WorkspaceLayout,
        generator: Arc<dyn Generator>,
        tools: Arc<dyn ToolDispatch>,
        options: SessionOptions,
        background: BackgroundPasses,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                layout,
                generator,
                tools,
                options,
                background,
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Workspace this session operates on.
    pub fn layout(&self) -> &WorkspaceLayout {
        &self.inner.layout
    }

    /// Instructions and user prompt for a conversation, without running it.
    pub fn prepare(&self, messages: &[ChatMessage]) -> (Mode, GenerationRequest) {
        prepare_request(&self.inner.layout, &self.inner.options, messages)
    }

    /// Run one turn. The stream ends after `done` (plus any background
    /// announcements) or after a single `error`.
    pub fn run_turn(&self, messages: Vec<ChatMessage>) -> ChatEventStream {
        let session = self.clone();
        Box::pin(async_stream::stream! {
            let (mode, request) = session.prepare(&messages);
            info!(mode = mode.name(), "turn started");
            yield ChatEvent::status("Thinking...");

            let inner = &session.inner;
            let mut stream = match inner.generator.generate(request, Arc::clone(&inner.tools)).await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(error = %e, "generation failed to start");
                    yield ChatEvent::Error { message: e.to_string() };
                    return;
                }
            };

            while let Some(event) = stream.next().await {
                match event {
                    Ok(event) => yield ChatEvent::from(event),
                    Err(e) => {
                        warn!(error = %e, "generation failed");
                        yield ChatEvent::Error { message: e.to_string() };
                        return;
                    }
                }
            }
            yield ChatEvent::Done;
            info!(mode = mode.name(), "turn complete");

            if mode == Mode::Done {
                let handles = inner.background.spawn();
                let kinds: Vec<_> = handles.iter().map(|h| h.kind).collect();
                let mut pending = inner.pending.lock().await;
                prune_finished(&mut pending);
                pending.extend(handles);
                drop(pending);
                for kind in kinds {
                    yield ChatEvent::status(announcement(kind));
                }
            }
        })
    }

    /// Take the handles of passes spawned so far. Handles of passes that had
    /// already finished when a later wrap-up turn spawned new ones are
    /// dropped; their outcomes are only in the log.
    pub async fn take_background(&self) -> Vec<PassHandle> {
        std::mem::take(&mut *self.inner.pending.lock().await)
    }
}

/// Context options for one turn, with the opt-in digests loaded.
pub fn context_options(
    layout: &WorkspaceLayout,
    options: &SessionOptions,
    assignment: Option<String>,
) -> ContextOptions {
    let mut extra_sections = Vec::new();
    if options.include_progress {
        extra_sections.extend(load_progress(layout));
    }
    if options.include_fact_check {
        extra_sections.extend(load_fact_check_report(layout));
    }
    ContextOptions {
        assignment_id: assignment,
        recent_lecture_count: options.recent_lecture_count,
        overview_excerpt_chars: options.overview_excerpt_chars,
        extra_sections,
    }
}

/// Detect the mode of the latest user message and build the request the
/// collaborator would receive for it.
pub fn prepare_request(
    layout: &WorkspaceLayout,
    options: &SessionOptions,
    messages: &[ChatMessage],
) -> (Mode, GenerationRequest) {
    let (history, latest) = split_latest(messages);
    let detection = detect_mode(latest);
    let assignment = match detection.mode {
        Mode::Work => assignment_id(&detection.residual),
        _ => None,
    };
    debug!(mode = detection.mode.name(), ?assignment, "mode detected");

    let context = build_context(
        layout,
        detection.mode,
        &context_options(layout, options, assignment),
    );
    let instructions = build_instructions(detection.mode, &context, &options.prompt);
    let prompt = build_prompt(history, &detection.residual);
    (detection.mode, GenerationRequest::new(instructions, prompt))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::events::GenerationEvent;
    use quire_core::generation::{GenerationError, GenerationStream};
    use quire_tools::ToolRegistry;
    use std::fs;

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

    fn workspace() -> (tempfile::TempDir, WorkspaceLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(dir.path().join("math-104"));
        let hw = layout.assignment_dir("hw2");
        fs::create_dir_all(&hw).unwrap();
        fs::write(hw.join("assignment.txt"), "Prove the Heine-Borel theorem.").unwrap();
        (dir, layout)
    }

    fn options() -> SessionOptions {
        SessionOptions {
            prompt: PromptParams {
                class_name: "math 104".into(),
                backend_url: "http://localhost:8200".into(),
                class_slug: "math-104".into(),
            },
            ..SessionOptions::default()
        }
    }

    fn session(layout: &WorkspaceLayout, generator: MockGen) -> Session {
        Session::new(
            layout.clone(),
            Arc::new(generator),
            Arc::new(ToolRegistry::new()),
            options(),
        )
    }

    fn stream_of(events: Vec<Result<GenerationEvent, GenerationError>>) -> GenerationStream {
        Box::pin(futures::stream::iter(events))
    }

    #[test]
    fn prepare_routes_work_mode_to_assignment() {
        let (_dir, layout) = workspace();
        let s = session(&layout, MockGen::new());
        let (mode, request) = s.prepare(&[ChatMessage::user("/Work hw2 please")]);
        assert_eq!(mode, Mode::Work);
        assert_eq!(request.prompt, "hw2 please");
        assert!(request.instructions.contains("### Assignment (hw2)\nProve the Heine-Borel theorem."));
        assert!(request.instructions.contains("math 104"));
    }

    #[test]
    fn prepare_without_messages_starts_session() {
        let (_dir, layout) = workspace();
        let s = session(&layout, MockGen::new());
        let (mode, request) = s.prepare(&[]);
        assert_eq!(mode, Mode::Default);
        assert_eq!(request.prompt, "(session started)");
    }

    #[test]
    fn digests_are_opt_in() {
        let (_dir, layout) = workspace();
        let progress = layout.progress_tex();
        fs::create_dir_all(progress.parent().unwrap()).unwrap();
        fs::write(&progress, "\\begin{document}\nSteady work on compactness.\n\\end{document}").unwrap();

        let s = session(&layout, MockGen::new());
        assert!(context_options(s.layout(), &options(), None).extra_sections.is_empty());

        let opts = SessionOptions {
            include_progress: true,
            ..options()
        };
        let extra = context_options(&layout, &opts, None).extra_sections;
        assert_eq!(extra.len(), 1);
        assert!(extra[0].contains("Steady work on compactness."));
    }

    #[tokio::test]
    async fn maps_collaborator_events() {
        let (_dir, layout) = workspace();
        let mut generator = MockGen::new();
        let _ = generator.expect_generate().times(1).returning(|_, _| {
            Ok(stream_of(vec![
                Ok(GenerationEvent::ContentDelta { delta: "Hi".into() }),
                Ok(GenerationEvent::ToolCompleted {
                    call_id: "c1".into(),
                    name: "read_file".into(),
                    arguments: serde_json::json!({"path": "x"}),
                    result: "y".repeat(2100),
                }),
            ]))
        });

        let events: Vec<ChatEvent> = session(&layout, generator)
            .run_turn(vec![ChatMessage::user("hello")])
            .collect()
            .await;
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ChatEvent::status("Thinking..."));
        assert_eq!(events[1], ChatEvent::Message { content: "Hi".into() });
        match &events[2] {
            ChatEvent::ToolCallComplete { result, .. } => {
                assert_eq!(result.chars().count(), 2003);
                assert!(result.ends_with("..."));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(events[3], ChatEvent::Done);
    }

    #[tokio::test]
    async fn stream_error_ends_turn() {
        let (_dir, layout) = workspace();
        let mut generator = MockGen::new();
        let _ = generator.expect_generate().returning(|_, _| {
            Ok(stream_of(vec![Err(GenerationError::Transport {
                message: "connection reset".into(),
            })]))
        });

        let events: Vec<ChatEvent> = session(&layout, generator)
            .run_turn(vec![ChatMessage::user("/done")])
            .collect()
            .await;
        assert_eq!(
            events.last(),
            Some(&ChatEvent::Error {
                message: "transport error: connection reset".into()
            })
        );
        assert!(!events.contains(&ChatEvent::Done));
    }

    #[tokio::test]
    async fn start_failure_is_an_error_event() {
        let (_dir, layout) = workspace();
        let mut generator = MockGen::new();
        let _ = generator.expect_generate().returning(|_, _| {
            Err(GenerationError::Provider {
                message: "bad key".into(),
            })
        });

        let events: Vec<ChatEvent> = session(&layout, generator)
            .run_turn(vec![ChatMessage::user("hello")])
            .collect()
            .await;
        assert_eq!(events.len(), 2);
        assert!(events[1].is_terminal());
    }
}
