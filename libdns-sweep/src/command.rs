use async_trait::async_trait;
use std::{process::Stdio, time::Duration};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProbeInvocationError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {code:?}")]
    ExitStatus { program: String, code: Option<i32> },
    #[error("{program} timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
    #[error("Refusing to pass {operand:?} to {program}: it would be read as an option")]
    OptionLikeOperand { program: String, operand: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    /// Turns a non-zero exit into an error, for tools whose failures carry no data.
    pub fn require_success(self, program: &str) -> Result<Self, ProbeInvocationError> {
        if self.success {
            Ok(self)
        } else {
            Err(ProbeInvocationError::ExitStatus {
                program: program.to_string(),
                code: self.code,
            })
        }
    }
}

/// Runs external lookup tools. Implementations must return once `timeout` elapses.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, ProbeInvocationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, ProbeInvocationError> {
        debug!(program, ?args, "spawning probe command");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeInvocationError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Dropping the wait future on timeout kills the child.
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(CommandOutput {
                success: output.status.success(),
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            }),
            Ok(Err(source)) => Err(ProbeInvocationError::Spawn {
                program: program.to_string(),
                source,
            }),
            Err(_) => Err(ProbeInvocationError::Timeout {
                program: program.to_string(),
                timeout,
            }),
        }
    }
}

/// Rejects operands that the tool's argument parser would take for a flag.
pub(crate) fn ensure_operand(program: &str, operand: &str) -> Result<(), ProbeInvocationError> {
    if operand.starts_with('-') {
        return Err(ProbeInvocationError::OptionLikeOperand {
            program: program.to_string(),
            operand: operand.to_string(),
        });
    }
    Ok(())
}

/// Splits short-form tool output into values, one per non-empty line.
pub(crate) fn output_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_lines_skips_blank_lines() {
        assert_eq!(output_lines("1.2.3.4\n\n  5.6.7.8  \n"), vec!["1.2.3.4", "5.6.7.8"]);
        assert!(output_lines("\n").is_empty());
    }

    #[test]
    fn dash_prefixed_operand_is_rejected() {
        assert!(ensure_operand("dig", "a.example").is_ok());
        assert!(matches!(
            ensure_operand("dig", "-h evil.host"),
            Err(ProbeInvocationError::OptionLikeOperand { .. })
        ));
    }

    #[test]
    fn failed_exit_becomes_error() {
        let output = CommandOutput { success: false, code: Some(9), stdout: String::new() };
        let err = output.require_success("dig").unwrap_err();
        assert!(matches!(err, ProbeInvocationError::ExitStatus { code: Some(9), .. }));
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let result = SystemRunner
            .run("dscan-no-such-program", &[], Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(ProbeInvocationError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_program_times_out() {
        let result = SystemRunner
            .run("sleep", &["5"], Duration::from_millis(100))
            .await;
        assert!(matches!(result, Err(ProbeInvocationError::Timeout { .. })));
    }
}
