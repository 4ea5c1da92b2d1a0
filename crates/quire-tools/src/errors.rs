//! Error types for notebook operations, compilation, the HTTP-backed
//! services (search, Drive), and the tool adapter layer.
//!
//! Typed errors stay typed until a tool adapter renders them into the text
//! handed back to the collaborator.

use std::io;

use thiserror::Error;

/// Failures of the sandboxed notebook operations.
#[derive(Debug, Error)]
pub enum NotebookError {
    /// The path resolves outside the workspace root. No I/O was attempted.
    #[error("path escapes notebook directory")]
    PathEscapes {
        /// The rejected path as given.
        path: String,
    },

    /// The target does not exist.
    #[error("file not found: {path}")]
    NotFound {
        /// Relative path that was not found.
        path: String,
    },

    /// A directory was expected.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// Relative path of the non-directory.
        path: String,
    },

    /// The document being created already exists. Nothing was overwritten.
    #[error("{id} already exists")]
    AlreadyExists {
        /// Identifier of the existing document.
        id: String,
    },

    /// The lecture template is missing.
    #[error("template not found at {path}")]
    TemplateMissing {
        /// Relative path of the expected template.
        path: String,
    },

    /// An argument cannot be used as given.
    #[error("{message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// Filesystem failure.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Relative path being accessed.
        path: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl NotebookError {
    /// Wrap an I/O error for `path`, mapping `NotFound` to [`Self::NotFound`].
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Failures of the external process seam.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be found.
    #[error("{program} not installed")]
    NotInstalled {
        /// Program name.
        program: String,
    },

    /// The process could not be started or awaited.
    #[error("failed to run {program}: {source}")]
    Io {
        /// Program name.
        program: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Failures of the compile pipeline. Each kind renders differently.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Target names something other than a plain document id.
    #[error("invalid compile target: {target}")]
    InvalidTarget {
        /// Requested target.
        target: String,
    },

    /// The target's source document is missing.
    #[error("{file} not found")]
    SourceNotFound {
        /// File name of the missing source.
        file: String,
    },

    /// The typesetting program is not installed.
    #[error("{program} not installed. Install TeX Live.")]
    NotInstalled {
        /// Program name.
        program: String,
    },

    /// A step exceeded the configured timeout.
    #[error("compilation timed out after {seconds} seconds")]
    TimedOut {
        /// Timeout in whole seconds.
        seconds: u64,
    },

    /// A typesetting step of a multi-step build exited non-zero.
    #[error("Compilation failed at {step}:\n{detail}")]
    StepFailed {
        /// Program that failed.
        step: String,
        /// Error lines from its output.
        detail: String,
    },

    /// The single typesetting pass exited non-zero.
    #[error("Compilation failed:\n{detail}")]
    Failed {
        /// Error lines from its output.
        detail: String,
    },

    /// Every step succeeded but no PDF appeared.
    #[error("PDF not generated")]
    NoArtifact,

    /// Filesystem or process failure around the build.
    #[error("{message}")]
    Io {
        /// Description of the failure.
        message: String,
    },
}

impl CompileError {
    /// Whether this is a typesetting failure (rendered without `Error:`).
    pub fn is_typeset_failure(&self) -> bool {
        matches!(self, Self::StepFailed { .. } | Self::Failed { .. })
    }
}

/// Transport failures of the injectable HTTP client.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection, timeout, or body read failure.
    #[error("request failed: {message}")]
    Transport {
        /// Error description.
        message: String,
    },
}

/// Failures of the web-search client.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No API key is configured.
    #[error("search API key not configured")]
    MissingApiKey,

    /// The request never produced a response.
    #[error("search {0}")]
    Http(#[from] HttpError),

    /// The service answered with a non-success status.
    #[error("search API error: HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body is not the expected JSON.
    #[error("failed to parse search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures of the Drive import client.
#[derive(Debug, Error)]
pub enum DriveError {
    /// No API key is configured.
    #[error("Drive API key not configured")]
    MissingApiKey,

    /// The request never produced a response.
    #[error("Drive {0}")]
    Http(#[from] HttpError),

    /// The service answered with a non-success status.
    #[error("Drive API error: HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The service ran the action and reported it unsuccessful.
    #[error("{message}")]
    Rejected {
        /// Error text from the service.
        message: String,
    },

    /// The response body is not the expected JSON.
    #[error("failed to parse Drive response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised by tool adapters themselves (not user-visible failures,
/// which come back as error results).
#[derive(Debug, Error)]
pub enum ToolError {
    /// Parameter validation failed.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Tool not found in the registry.
    #[error("tool not found: {name}")]
    ToolNotFound {
        /// Requested tool name.
        name: String,
    },

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (catch-all).
    #[error("{message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}
