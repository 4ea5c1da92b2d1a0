//! External typesetting pipeline.
//!
//! The master document builds in three steps (typeset, build index, typeset
//! again); any other target builds in a single typeset pass. A non-zero exit
//! from a typeset step is fatal, a non-zero exit from the index step is
//! tolerated since the index may not exist yet. The produced PDF is copied
//! to the workspace root under its conventional name.

use std::sync::Arc;

use quire_core::WorkspaceLayout;
use quire_core::workspace::{MASTER_TARGET, is_plain_name};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::{CompileError, ProcessError};
use crate::traits::{ProcessOutput, ProcessRunner, ProcessSpec};

/// Characters of raw output kept when no error lines are found.
const OUTPUT_TAIL_CHARS: usize = 500;

/// Compile pipeline configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Typesetting executable.
    pub typeset_program: String,
    /// Index builder executable.
    pub index_program: String,
    /// Per-step timeout in milliseconds.
    pub timeout_ms: u64,
    /// Base URL under which compiled documents are served.
    pub backend_url: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            typeset_program: "pdflatex".into(),
            index_program: "makeindex".into(),
            timeout_ms: 120_000,
            backend_url: "http://localhost:8200".into(),
        }
    }
}

/// A successfully compiled document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// File name at the workspace root.
    pub file_name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Download URL.
    pub url: String,
}

impl CompiledArtifact {
    /// Text returned to the collaborator.
    pub fn message(&self) -> String {
        format!(
            "Compiled successfully ({}KB). Download: {}",
            self.size_bytes / 1024,
            self.url
        )
    }
}

/// One step of a build.
struct Step {
    program: String,
    args: Vec<String>,
    fatal: bool,
}

/// Runs the typesetting pipeline for one workspace.
pub struct Compiler {
    layout: WorkspaceLayout,
    runner: Arc<dyn ProcessRunner>,
    options: CompileOptions,
}

impl Compiler {
    /// Create a compiler.
    pub fn new(layout: WorkspaceLayout, runner: Arc<dyn ProcessRunner>, options: CompileOptions) -> Self {
        Self {
            layout,
            runner,
            options,
        }
    }

    /// Compile `target` (`master` or a document id such as `lec03`).
    pub async fn compile(
        &self,
        target: &str,
        cancellation: &CancellationToken,
    ) -> Result<CompiledArtifact, CompileError> {
        let target = match target.trim() {
            "" => MASTER_TARGET,
            t => t,
        };
        if !is_plain_name(target) {
            return Err(CompileError::InvalidTarget {
                target: target.to_string(),
            });
        }

        let tex_path = self.layout.subfile(target);
        let tex_name = format!("{target}.tex");
        if !tex_path.is_file() {
            return Err(CompileError::SourceNotFound { file: tex_name });
        }
        let Some(working_directory) = tex_path.parent().map(std::path::Path::to_path_buf) else {
            return Err(CompileError::SourceNotFound { file: tex_name });
        };

        let is_master = target == MASTER_TARGET;
        for step in self.steps(target, &tex_name, is_master) {
            let spec = ProcessSpec {
                program: step.program.clone(),
                args: step.args,
                working_directory: working_directory.clone(),
                timeout_ms: self.options.timeout_ms,
                cancellation: cancellation.clone(),
            };
            let output = match self.runner.run(&spec).await {
                Ok(output) => output,
                Err(ProcessError::NotInstalled { program }) if !step.fatal => {
                    warn!(%program, "index builder not installed, skipping");
                    continue;
                }
                Err(ProcessError::NotInstalled { program }) => {
                    return Err(CompileError::NotInstalled { program });
                }
                Err(e @ ProcessError::Io { .. }) => {
                    return Err(CompileError::Io {
                        message: e.to_string(),
                    });
                }
            };
            self.check_step(&step.program, step.fatal, is_master, &output)?;
        }

        let pdf_path = tex_path.with_extension("pdf");
        if !pdf_path.is_file() {
            return Err(CompileError::NoArtifact);
        }

        let file_name = if is_master {
            self.layout.master_pdf_name()
        } else {
            format!("{target}.pdf")
        };
        let size_bytes = tokio::fs::copy(&pdf_path, self.layout.root().join(&file_name))
            .await
            .map_err(|e| CompileError::Io {
                message: format!("failed to copy {file_name}: {e}"),
            })?;

        let url = format!(
            "{}/pdf/{}/{file_name}",
            self.options.backend_url.trim_end_matches('/'),
            self.layout.slug()
        );
        info!(target, %file_name, size_bytes, "compiled");
        Ok(CompiledArtifact {
            file_name,
            size_bytes,
            url,
        })
    }

    fn steps(&self, target: &str, tex_name: &str, is_master: bool) -> Vec<Step> {
        let typeset = || Step {
            program: self.options.typeset_program.clone(),
            args: vec!["-interaction=nonstopmode".into(), tex_name.to_string()],
            fatal: true,
        };
        if is_master {
            vec![
                typeset(),
                Step {
                    program: self.options.index_program.clone(),
                    args: vec![format!("{target}.idx")],
                    fatal: false,
                },
                typeset(),
            ]
        } else {
            vec![typeset()]
        }
    }

    fn check_step(
        &self,
        program: &str,
        fatal: bool,
        is_master: bool,
        output: &ProcessOutput,
    ) -> Result<(), CompileError> {
        if output.timed_out {
            return Err(CompileError::TimedOut {
                seconds: self.options.timeout_ms / 1000,
            });
        }
        if output.interrupted {
            return Err(CompileError::Io {
                message: "compilation cancelled".into(),
            });
        }
        if output.exit_code == 0 {
            return Ok(());
        }
        if !fatal {
            warn!(program, exit_code = output.exit_code, "non-fatal build step failed");
            return Ok(());
        }

        let detail = error_detail(output);
        warn!(program, exit_code = output.exit_code, "typesetting failed");
        Err(if is_master {
            CompileError::StepFailed {
                step: program.to_string(),
                detail,
            }
        } else {
            CompileError::Failed { detail }
        })
    }
}

/// Error lines (`!`-prefixed) of the typesetter's output, or its tail.
///
/// The typesetter writes errors to standard output.
fn error_detail(output: &ProcessOutput) -> String {
    let text = [&output.stdout, &output.stderr]
        .into_iter()
        .find(|s| !s.is_empty())
        .map_or("(no output)", String::as_str);

    let errors: Vec<&str> = text.lines().filter(|l| l.starts_with('!')).collect();
    if !errors.is_empty() {
        return errors.join("\n");
    }
    let skip = text.chars().count().saturating_sub(OUTPUT_TAIL_CHARS);
    text.chars().skip(skip).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
