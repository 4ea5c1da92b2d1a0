//! Real process runner using `tokio::process::Command`.

use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::ProcessError;
use crate::traits::{ProcessOutput, ProcessRunner, ProcessSpec};

/// Subprocess execution backed by `tokio::process::Command`.
///
/// The program is run directly, without a shell. A timed-out or cancelled
/// child is killed when its handle drops.
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, ProcessError> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let mut cmd = tokio::process::Command::new(&spec.program);
        let _ = cmd
            .args(&spec.args)
            .current_dir(&spec.working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            program = %spec.program,
            args = ?spec.args,
            working_dir = %spec.working_directory.display(),
            "spawning process"
        );

        let child = cmd.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ProcessError::NotInstalled {
                program: spec.program.clone(),
            },
            _ => ProcessError::Io {
                program: spec.program.clone(),
                source: e,
            },
        })?;

        let timeout = Duration::from_millis(spec.timeout_ms);
        let output = tokio::select! {
            result = child.wait_with_output() => {
                result.map_err(|e| ProcessError::Io { program: spec.program.clone(), source: e })?
            }
            () = tokio::time::sleep(timeout) => {
                warn!(program = %spec.program, timeout_ms = spec.timeout_ms, "process timed out");
                return Ok(ProcessOutput {
                    stderr: "Process timed out".into(),
                    exit_code: -1,
                    duration_ms: elapsed_ms(),
                    timed_out: true,
                    ..ProcessOutput::default()
                });
            }
            () = spec.cancellation.cancelled() => {
                debug!(program = %spec.program, "process cancelled");
                return Ok(ProcessOutput {
                    stderr: "Process cancelled".into(),
                    exit_code: -1,
                    duration_ms: elapsed_ms(),
                    interrupted: true,
                    ..ProcessOutput::default()
                });
            }
        };

        let duration_ms = elapsed_ms();
        let exit_code = output.status.code().unwrap_or(-1);
        debug!(program = %spec.program, exit_code, duration_ms, "process completed");

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            duration_ms,
            timed_out: false,
            interrupted: false,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokio_util::sync::CancellationToken;

    fn spec(program: &str, args: &[&str]) -> ProcessSpec {
        ProcessSpec {
            program: program.into(),
            args: args.iter().map(ToString::to_string).collect(),
            working_directory: std::env::temp_dir(),
            timeout_ms: 10_000,
            cancellation: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn run_echo() {
        let out = TokioProcessRunner.run(&spec("echo", &["hello"])).await.unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.success());
    }

    #[tokio::test]
    async fn run_exit_code() {
        let out = TokioProcessRunner.run(&spec("sh", &["-c", "exit 42"])).await.unwrap();
        assert_eq!(out.exit_code, 42);
        assert!(!out.success());
    }

    #[tokio::test]
    async fn missing_program_is_not_installed() {
        let err = TokioProcessRunner
            .run(&spec("quire-no-such-program", &[]))
            .await
            .unwrap_err();
        assert_matches!(err, ProcessError::NotInstalled { program } if program == "quire-no-such-program");
    }

    #[tokio::test]
    async fn run_timeout() {
        let mut s = spec("sleep", &["10"]);
        s.timeout_ms = 50;
        let out = TokioProcessRunner.run(&s).await.unwrap();
        assert!(out.timed_out);
    }

    #[tokio::test]
    async fn run_cancellation() {
        let s = spec("sleep", &["10"]);
        let cancel = s.cancellation.clone();
        let handle = tokio::spawn(async move { TokioProcessRunner.run(&s).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        let out = handle.await.unwrap().unwrap();
        assert!(out.interrupted);
    }
}
