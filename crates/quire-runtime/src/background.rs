//! Fire-and-forget scheduling of the background passes.
//!
//! The passes are spawned onto the tokio runtime after a wrap-up turn. They
//! are independent of each other and of the turn's event stream; nothing
//! waits for them unless a caller awaits the returned handles.

use std::sync::Arc;

use quire_passes::{FactCheckPass, PassKind, PassOutcome, ProgressPass};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A spawned pass.
#[derive(Debug)]
pub struct PassHandle {
    /// Which pass.
    pub kind: PassKind,
    /// Resolves to the pass outcome.
    pub handle: JoinHandle<PassOutcome>,
}

impl PassHandle {
    /// Wait for the pass. A panicked or aborted task becomes a failure.
    pub async fn join(self) -> PassOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(pass = self.kind.name(), error = %e, "background pass task failed");
                PassOutcome::Failed {
                    message: format!("{} pass aborted: {e}", self.kind.name()),
                }
            }
        }
    }
}

/// The passes scheduled after a wrap-up turn.
#[derive(Clone, Default)]
pub struct BackgroundPasses {
    fact_check: Option<Arc<FactCheckPass>>,
    progress: Option<Arc<ProgressPass>>,
}

impl BackgroundPasses {
    /// No passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the fact-check pass.
    #[must_use]
    pub fn with_fact_check(mut self, pass: FactCheckPass) -> Self {
        self.fact_check = Some(Arc::new(pass));
        self
    }

    /// Schedule the progress pass.
    #[must_use]
    pub fn with_progress(mut self, pass: ProgressPass) -> Self {
        self.progress = Some(Arc::new(pass));
        self
    }

    /// Whether no pass is configured.
    pub fn is_empty(&self) -> bool {
        self.fact_check.is_none() && self.progress.is_none()
    }

    /// Spawn every configured pass, fact-check first.
    pub fn spawn(&self) -> Vec<PassHandle> {
        let mut handles = Vec::with_capacity(2);
        if let Some(pass) = &self.fact_check {
            let pass = Arc::clone(pass);
            info!(pass = PassKind::FactCheck.name(), "spawning background pass");
            handles.push(PassHandle {
                kind: PassKind::FactCheck,
                handle: tokio::spawn(async move { pass.run().await }),
            });
        }
        if let Some(pass) = &self.progress {
            let pass = Arc::clone(pass);
            info!(pass = PassKind::Progress.name(), "spawning background pass");
            handles.push(PassHandle {
                kind: PassKind::Progress,
                handle: tokio::spawn(async move { pass.run().await }),
            });
        }
        handles
    }
}

/// Drop handles whose task has already finished.
pub(crate) fn prune_finished(handles: &mut Vec<PassHandle>) {
    let before = handles.len();
    handles.retain(|h| !h.handle.is_finished());
    let pruned = before - handles.len();
    if pruned > 0 {
        debug!(pruned, "dropped finished background pass handles");
    }
}

/// Status line announcing a spawned pass.
pub fn announcement(kind: PassKind) -> &'static str {
    match kind {
        PassKind::FactCheck => "Fact-check pass started in background...",
        PassKind::Progress => "Updating student progress narrative...",
    }
}
