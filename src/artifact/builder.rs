// ABOUTME: Archive creation through the command executor.
// ABOUTME: Composes mkdir/zip/rm command lines from the resolved configuration.

use crate::config::DeploymentConfig;
use crate::exec::{CommandRunner, ExecError};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("`{command}` failed{}{}", exit_suffix(.exit_code), stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" with exit code {c}"))
        .unwrap_or_default()
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Quote a value for `sh`.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

pub fn mkdir_command(config: &DeploymentConfig) -> String {
    format!("mkdir -p {}", shell_quote(config.build_directory()))
}

/// `zip` invocation archiving the source path recursively.
///
/// The build directory is always excluded; `excludeString` tokens are appended
/// verbatim so glob patterns reach `zip` unchanged.
pub fn archive_command(config: &DeploymentConfig) -> String {
    let mut command = format!(
        "zip {} {} --recurse-paths --exclude {}",
        shell_quote(&config.artifact_path().to_string_lossy()),
        shell_quote(config.source_path()),
        shell_quote(&format!("{}/*", config.build_directory())),
    );

    if let Some(exclude) = config.exclude_string() {
        command.push(' ');
        command.push_str(exclude);
    }

    if config.quiet_build() {
        command.push_str(" --quiet");
    }

    command
}

pub fn cleanup_command(config: &DeploymentConfig) -> String {
    format!("rm -rf {}", shell_quote(config.build_directory()))
}

/// Packages the source tree into the release artifact.
pub struct ArtifactBuilder<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> ArtifactBuilder<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Create the build directory, then archive the source tree into it.
    pub async fn build(&self, config: &DeploymentConfig) -> Result<(), BuildError> {
        self.run(&mkdir_command(config)).await?;
        self.run(&archive_command(config)).await?;
        tracing::info!(
            artifact = %config.artifact_path().display(),
            "artifact built"
        );
        Ok(())
    }

    /// Remove the build directory; absence of the directory is not an error.
    pub async fn remove_build_directory(&self, config: &DeploymentConfig) -> Result<(), BuildError> {
        self.run(&cleanup_command(config)).await
    }

    async fn run(&self, command: &str) -> Result<(), BuildError> {
        let output = self.runner.run(command).await?;
        if output.success {
            Ok(())
        } else {
            Err(BuildError::CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;
    use std::path::Path;

    fn config(exclude: Option<&str>, quiet: bool) -> DeploymentConfig {
        let raw = RawConfig {
            application_name: Some("api".to_string()),
            deployment_group: Some("staging".to_string()),
            s3_bucket: Some("bucket".to_string()),
            region: Some("us-east-1".to_string()),
            source_path: Some(".".to_string()),
            exclude_string: exclude.map(str::to_string),
            quiet_build: quiet,
            ..RawConfig::default()
        };
        DeploymentConfig::resolve(&raw, Path::new("/work")).unwrap()
    }

    #[test]
    fn archive_command_excludes_build_directory() {
        assert_eq!(
            archive_command(&config(None, false)),
            "zip 'aws_build/api_staging_release_artifact.zip' '.' --recurse-paths --exclude 'aws_build/*'"
        );
    }

    #[test]
    fn archive_command_appends_excludes_verbatim_and_quiet() {
        assert_eq!(
            archive_command(&config(Some("*.git* node_modules/*"), true)),
            "zip 'aws_build/api_staging_release_artifact.zip' '.' --recurse-paths \
             --exclude 'aws_build/*' *.git* node_modules/* --quiet"
        );
    }

    #[test]
    fn directory_commands() {
        let config = config(None, true);
        assert_eq!(mkdir_command(&config), "mkdir -p 'aws_build'");
        assert_eq!(cleanup_command(&config), "rm -rf 'aws_build'");
    }

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn command_failure_message_includes_exit_code_and_stderr() {
        let err = BuildError::CommandFailed {
            command: "zip x".to_string(),
            exit_code: Some(12),
            stderr: "zip error: Nothing to do!\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`zip x` failed with exit code 12: zip error: Nothing to do!"
        );
    }
}
