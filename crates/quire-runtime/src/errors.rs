//! Runtime error types.

use std::path::PathBuf;

use quire_settings::SettingsError;
use thiserror::Error;

/// Failures assembling a session. Turn failures never surface here; they
/// become [`quire_core::ChatEvent::Error`] events.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Settings could not produce a workspace.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The configured workspace directory does not exist.
    #[error("workspace not found: {}", path.display())]
    WorkspaceMissing {
        /// Expected workspace root.
        path: PathBuf,
    },
}
