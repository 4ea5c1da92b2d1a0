//! Subcommand implementations. Each returns the text to print; a failed tool
//! result is reported through [`Output::failed`] so `main` can set the exit
//! code.

use anyhow::{Context, Result};
use quire_context::build_context;
use quire_core::workspace::MASTER_TARGET;
use quire_passes::{PassKind, changed_since, load_cursor, load_fact_check_report, load_progress};
use quire_runtime::{ChatMessage, Services, SessionOptions, context_options, prepare_request};
use quire_settings::QuireSettings;
use quire_tools::traits::ToolContext;
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::Command;

/// Text produced by a subcommand.
#[derive(Debug)]
pub struct Output {
    /// What to print.
    pub text: String,
    /// Whether the command reported a failure.
    pub failed: bool,
}

impl Output {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }
}

/// Run one subcommand against the active workspace.
pub async fn run(command: &Command, settings: &QuireSettings) -> Result<Output> {
    let services = Services::from_settings(settings).context("Failed to open class workspace")?;
    let layout = &services.layout;
    let options = SessionOptions::from_settings(settings);

    match command {
        Command::Context { mode, assignment } => {
            let opts = context_options(layout, &options, assignment.clone());
            Ok(Output::ok(build_context(layout, *mode, &opts)))
        }
        Command::Prompt { message } => {
            let (mode, request) = prepare_request(layout, &options, &[ChatMessage::user(message)]);
            Ok(Output::ok(format!(
                "mode: {mode}\n\n=== instructions ===\n{}\n\n=== prompt ===\n{}",
                request.instructions, request.prompt
            )))
        }
        Command::Tool { name, args } => {
            let arguments: Value = serde_json::from_str(args)
                .with_context(|| format!("--args is not valid JSON: {args}"))?;
            Ok(invoke(&services, name, arguments).await)
        }
        Command::Compile { target } => {
            let arguments = if target == MASTER_TARGET {
                json!({})
            } else {
                json!({ "target": target })
            };
            Ok(invoke(&services, "compile_notes", arguments).await)
        }
        Command::Changed { pass } => {
            let kind = PassKind::from(*pass);
            let cursor = load_cursor(layout, kind);
            let changed = changed_since(layout, kind, cursor);
            if changed.is_empty() {
                return Ok(Output::ok(format!("No changes since last {} run.", kind.name())));
            }
            let lines: Vec<String> = changed.iter().map(|p| layout.relative(p)).collect();
            Ok(Output::ok(lines.join("\n")))
        }
        Command::Report => Ok(Output::ok(
            load_fact_check_report(layout).unwrap_or_else(|| "No fact-check report.".into()),
        )),
        Command::Progress => Ok(Output::ok(
            load_progress(layout).unwrap_or_else(|| "No progress narrative yet.".into()),
        )),
    }
}

async fn invoke(services: &Services, name: &str, arguments: Value) -> Output {
    debug!(tool = name, "invoking tool from command line");
    let registry = services.all_tools();
    let result = registry.execute(name, arguments, &ToolContext::new("cli")).await;
    Output {
        failed: result.is_error(),
        text: result.content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PassArg;
    use quire_core::Mode;
    use std::fs;
    use std::path::Path;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn settings(root: &Path) -> QuireSettings {
        let mut s = QuireSettings::default();
        s.workspace.root = root.display().to_string();
        s.workspace.active_class = "math-104".into();
        s.search.api_key = None;
        s
    }

    fn workspace() -> (tempfile::TempDir, QuireSettings) {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let layout = settings.layout().unwrap();
        write(
            &layout.lecture_tex("lec01"),
            "\\renewcommand{\\lecturenum}{1}\n\\renewcommand{\\lecturetopic}{Ordered Fields}\n",
        );
        (dir, settings)
    }

    #[tokio::test]
    async fn missing_workspace_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&Command::Report, &settings(dir.path())).await.unwrap_err();
        assert!(err.to_string().contains("Failed to open class workspace"));
    }

    #[tokio::test]
    async fn context_prints_lecture_content() {
        let (_dir, settings) = workspace();
        let out = run(
            &Command::Context {
                mode: Mode::Lecture,
                assignment: None,
            },
            &settings,
        )
        .await
        .unwrap();
        assert!(out.text.contains("### Full content: lec01"));
        assert!(!out.failed);
    }

    #[tokio::test]
    async fn prompt_strips_command() {
        let (_dir, settings) = workspace();
        let out = run(
            &Command::Prompt {
                message: "/rev what is a field".into(),
            },
            &settings,
        )
        .await
        .unwrap();
        assert!(out.text.starts_with("mode: rev\n"));
        assert!(out.text.ends_with("=== prompt ===\nwhat is a field"));
    }

    #[tokio::test]
    async fn tool_results_set_failure() {
        let (_dir, settings) = workspace();
        let out = run(
            &Command::Tool {
                name: "read_file".into(),
                args: r#"{"path": "notes/latex/lec01/lec01.tex"}"#.into(),
            },
            &settings,
        )
        .await
        .unwrap();
        assert!(!out.failed);
        assert!(out.text.contains("Ordered Fields"));

        let out = run(
            &Command::Tool {
                name: "search_web".into(),
                args: "{}".into(),
            },
            &settings,
        )
        .await
        .unwrap();
        assert!(out.failed);
        assert_eq!(out.text, "Error: unknown tool: search_web");
    }

    #[tokio::test]
    async fn bad_tool_arguments_are_an_error() {
        let (_dir, settings) = workspace();
        let command = Command::Tool {
            name: "read_file".into(),
            args: "not json".into(),
        };
        assert!(run(&command, &settings).await.is_err());
    }

    #[tokio::test]
    async fn changed_lists_relative_paths() {
        let (_dir, settings) = workspace();
        let out = run(
            &Command::Changed {
                pass: PassArg::FactCheck,
            },
            &settings,
        )
        .await
        .unwrap();
        assert_eq!(out.text, "notes/latex/lec01/lec01.tex");
    }

    #[tokio::test]
    async fn digests_fall_back_to_notices() {
        let (_dir, settings) = workspace();
        let out = run(&Command::Report, &settings).await.unwrap();
        assert_eq!(out.text, "No fact-check report.");
        let out = run(&Command::Progress, &settings).await.unwrap();
        assert_eq!(out.text, "No progress narrative yet.");
    }
}
