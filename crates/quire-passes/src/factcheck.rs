//! Fact-check pass.
//!
//! Sends lectures changed since the last run to the generation collaborator
//! together with a web-search tool, and writes the structured findings to
//! `fact-check-report.json`. The report is read back into the conversational
//! context by [`load_fact_check_report`]; no notebook document is edited.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use quire_core::WorkspaceLayout;
use quire_core::generation::{GenerationRequest, Generator, ToolDispatch, collect_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::PassError;
use crate::outcome::PassOutcome;
use crate::state::{PassKind, changed_since, load_cursor, now_seconds, save_cursor};

const INSTRUCTIONS: &str = include_str!("prompts/factcheck.md");

/// Default cap on search calls per run.
pub const DEFAULT_TOOL_CALL_LIMIT: u32 = 30;

/// Verdict on one claim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingStatus {
    /// Confirmed by a source.
    Correct,
    /// Contradicted by a source.
    Incorrect,
    /// No source found either way.
    Unverified,
    /// Anything else the collaborator wrote.
    #[default]
    #[serde(other)]
    Unknown,
}

impl FindingStatus {
    /// Marker shown in the digest.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Correct => "OK",
            Self::Incorrect => "ISSUE",
            Self::Unverified | Self::Unknown => "?",
        }
    }
}

/// One checked claim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    /// Lecture path relative to the workspace root.
    pub file: Option<String>,
    /// Claim text as it appears in the lecture.
    pub claim: Option<String>,
    /// Verdict.
    pub status: FindingStatus,
    /// Suggested replacement when incorrect.
    pub correction: Option<String>,
    /// Most relevant source.
    pub source_url: Option<String>,
    /// Short explanation.
    pub explanation: Option<String>,
}

/// Contents of `fact-check-report.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Start time of the run that produced the report (epoch seconds).
    pub timestamp: f64,
    /// Lectures sent for checking.
    pub files_checked: Vec<String>,
    /// Findings, possibly empty.
    pub findings: Vec<Finding>,
}

/// The fact-check pass over one workspace.
pub struct FactCheckPass {
    layout: WorkspaceLayout,
    generator: Arc<dyn Generator>,
    tools: Arc<dyn ToolDispatch>,
    class_name: String,
    tool_call_limit: u32,
}

impl FactCheckPass {
    /// Create a pass. `tools` should offer `search_web`.
    pub fn new(
        layout: WorkspaceLayout,
        generator: Arc<dyn Generator>,
        tools: Arc<dyn ToolDispatch>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            generator,
            tools,
            class_name: class_name.into(),
            tool_call_limit: DEFAULT_TOOL_CALL_LIMIT,
        }
    }

    /// Override the search-call cap.
    #[must_use]
    pub fn with_tool_call_limit(mut self, limit: u32) -> Self {
        self.tool_call_limit = limit;
        self
    }

    /// Lectures changed since the last successful run.
    pub fn pending(&self) -> Vec<PathBuf> {
        let cursor = load_cursor(&self.layout, PassKind::FactCheck);
        changed_since(&self.layout, PassKind::FactCheck, cursor)
    }

    /// Run once. Failures are logged and rendered, never propagated.
    pub async fn run(&self) -> PassOutcome {
        let started = now_seconds();
        let changed = self.pending();
        if changed.is_empty() {
            info!(pass = "fact-check", "skipped, no lectures changed since last run");
            return PassOutcome::Skipped {
                reason: "No lectures changed since last fact-check.".into(),
            };
        }

        info!(pass = "fact-check", files = changed.len(), "pass started");
        match self.check(&changed, started).await {
            Ok((raw, findings)) => {
                info!(pass = "fact-check", files_checked = changed.len(), findings, "pass complete");
                PassOutcome::Completed {
                    documents: changed.len(),
                    output: raw,
                }
            }
            Err(e) => {
                error!(pass = "fact-check", error = %e, "pass failed");
                PassOutcome::Failed {
                    message: format!("Fact-check failed: {e}"),
                }
            }
        }
    }

    async fn check(&self, changed: &[PathBuf], started: f64) -> Result<(String, usize), PassError> {
        let mut blocks = Vec::with_capacity(changed.len());
        let mut files_checked = Vec::with_capacity(changed.len());
        for path in changed {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| PassError::io(path, e))?;
            let rel = self.layout.relative(path);
            blocks.push(format!("--- FILE: {rel} ---\n{content}\n--- END FILE ---"));
            files_checked.push(rel);
        }

        let prompt = format!(
            "Fact-check the following lecture files. They have been added or edited \
             since the last run.\n\n{}",
            blocks.join("\n\n")
        );
        let instructions = INSTRUCTIONS.replace("{className}", &self.class_name);
        let request =
            GenerationRequest::new(instructions, prompt).with_tool_call_limit(self.tool_call_limit);

        let stream = self
            .generator
            .generate(request, Arc::clone(&self.tools))
            .await?;
        let mut raw = collect_text(stream).await?;
        if raw.trim().is_empty() {
            raw = "[]".into();
        }

        let findings = parse_findings(&raw);
        let count = findings.len();
        let report = Report {
            timestamp: started,
            files_checked,
            findings,
        };
        let path = self.layout.fact_check_report();
        let body = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| PassError::io(&path, e))?;

        save_cursor(&self.layout, PassKind::FactCheck, started)?;
        Ok((raw, count))
    }
}

/// Findings from the collaborator's answer.
///
/// The whole answer is tried as a JSON array first, then the span from the
/// first `[` to the last `]`. Anything else yields no findings, as does an
/// element that is not a finding object.
pub fn parse_findings(raw: &str) -> Vec<Finding> {
    let value = serde_json::from_str::<Value>(raw.trim()).ok().or_else(|| {
        let start = raw.find('[')?;
        let end = raw.rfind(']')?;
        (start < end)
            .then(|| serde_json::from_str::<Value>(&raw[start..=end]).ok())
            .flatten()
    });

    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        Some(_) => {
            warn!("fact-check answer is not a JSON array");
            Vec::new()
        }
        None => {
            warn!("fact-check answer contains no JSON array");
            Vec::new()
        }
    }
}

/// Digest of the last report for the conversational context, or `None`
/// when there is no report or it has no findings.
pub fn load_fact_check_report(layout: &WorkspaceLayout) -> Option<String> {
    let text = std::fs::read_to_string(layout.fact_check_report()).ok()?;
    let report: Report = serde_json::from_str(&text).ok()?;
    if report.findings.is_empty() {
        return None;
    }

    let mut out = String::from("### Fact-Check Report (auto-generated)\n");
    let _ = writeln!(out, "_Last run: checked {} claim(s)_\n", report.findings.len());
    for finding in &report.findings {
        let file = finding.file.as_deref().unwrap_or("?");
        let claim = finding.claim.as_deref().unwrap_or("?");
        let _ = writeln!(out, "**[{}]** `{file}`: {claim}", finding.status.marker());
        if finding.status == FindingStatus::Incorrect {
            let _ = writeln!(
                out,
                "  Suggested correction: {}",
                finding.correction.as_deref().unwrap_or("?")
            );
            let _ = writeln!(out, "  Source: {}", finding.source_url.as_deref().unwrap_or("?"));
        }
        if let Some(explanation) = finding.explanation.as_deref().filter(|e| !e.is_empty()) {
            let _ = writeln!(out, "  {explanation}");
        }
        out.push('\n');
    }
    Some(out.trim_end().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
