//! Pass error types.

use std::path::PathBuf;

use quire_core::generation::GenerationError;
use thiserror::Error;

/// Failures inside a background pass.
///
/// Never propagated past the pass: [`crate::PassOutcome::Failed`] carries the
/// rendered message.
#[derive(Debug, Error)]
pub enum PassError {
    /// Filesystem failure.
    #[error("{}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A state or report file could not be encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The generation collaborator failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The collaborator returned nothing usable.
    #[error("{pass} returned an empty response")]
    EmptyOutput {
        /// Pass name.
        pass: &'static str,
    },
}

impl PassError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
