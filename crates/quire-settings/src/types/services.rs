//! Settings for external services: artifact links, typesetting, web search,
//! Drive import, and logging.

use serde::{Deserialize, Serialize};

/// Link generation for returned artifacts.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Base URL under which compiled artifacts are served.
    pub backend_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8200".to_string(),
        }
    }
}

/// External typesetting pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileSettings {
    /// Typesetting executable.
    pub typeset_program: String,
    /// Index builder executable.
    pub index_program: String,
    /// Per-step timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            typeset_program: "pdflatex".to_string(),
            index_program: "makeindex".to_string(),
            timeout_ms: 120_000,
        }
    }
}

/// Web search used by the fact-check pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSettings {
    /// API key. The fact-check pass is disabled without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Search endpoint.
    pub endpoint: String,
    /// Results requested per query.
    pub num_results: u32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://ydc-index.io/v1/search".to_string(),
            num_results: 5,
            timeout_ms: 30_000,
        }
    }
}

/// Google Drive import through the Composio tool-execution API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveSettings {
    /// Composio API key. The Drive tools are not offered without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Composio API base URL.
    pub endpoint: String,
    /// Connected-account user id. Resolved from the active Google Drive
    /// connection when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Toolkit version pinned on every call.
    pub toolkit_version: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://backend.composio.dev".to_string(),
            user_id: None,
            toolkit_version: "20260204_00".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
