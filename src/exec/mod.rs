// ABOUTME: Command execution collaborator used for packaging steps.
// ABOUTME: Runs shell command lines in the data directory and reports success.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

/// Result of running a command line.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            ..Self::default()
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Errors that prevent a command from running at all.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}

/// Runs command lines on behalf of the pipeline.
///
/// Callers only inspect success; output is kept for error messages.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command_line: &str) -> Result<CommandOutput, ExecError>;
}

/// Runs command lines through `sh -c` in a working directory.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    working_dir: PathBuf,
}

impl ShellRunner {
    pub fn new(working_dir: &Path) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command_line: &str) -> Result<CommandOutput, ExecError> {
        tracing::debug!(command = command_line, dir = %self.working_dir.display(), "running command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                command: command_line.to_string(),
                source,
            })?;

        let result = CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if result.success {
            tracing::debug!(command = command_line, "command completed");
        } else {
            tracing::warn!(
                command = command_line,
                exit_code = ?result.exit_code,
                "command failed"
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ShellRunner::new(dir.path());

        let output = runner.run("mkdir -p nested && pwd").await.unwrap();
        assert!(output.success);
        assert!(dir.path().join("nested").is_dir());
    }

    #[tokio::test]
    async fn reports_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ShellRunner::new(dir.path());

        let output = runner.run("echo oops >&2; exit 3").await.unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
        assert!(output.stderr.contains("oops"));
    }

    #[tokio::test]
    async fn missing_working_directory_is_a_spawn_error() {
        let runner = ShellRunner::new(Path::new("/nonexistent/cdrelease-test"));
        let err = runner.run("true").await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }
}
