//! Process execution utilities
//!
//! Provides process execution with proper error handling and logging.

use crate::error::{Result, RunnerError};
use std::io;
use std::process::{Command, Stdio};
use tracing::{debug, error, info, instrument};

/// Utility for running external processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    debug: bool,
}

/// Result of a captured process execution
#[derive(Debug, Clone, Default)]
pub struct ProcessResult {
    /// Exit status code
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Whether the process was successful
    pub success: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Run a command with arguments, inheriting stdout/stderr.
    ///
    /// A non-zero exit is reported as [`RunnerError::Process`].
    #[instrument(skip(self))]
    pub fn run_command(&self, command: &str, args: &[&str]) -> Result<()> {
        let exit_code = self.run_command_with_env(command, args, &[])?;
        if exit_code != Some(0) {
            return Err(RunnerError::process(
                format_command(command, args),
                exit_code,
                String::new(),
                format!("Command failed with exit code: {exit_code:?}"),
            ));
        }

        debug!("Command completed successfully");
        Ok(())
    }

    /// Run a command with extra environment variables and return its exit code.
    ///
    /// Output goes straight to the terminal. `None` means the process was
    /// terminated by a signal.
    #[instrument(skip(self, env_vars))]
    pub fn run_command_with_env(
        &self,
        command: &str,
        args: &[&str],
        env_vars: &[(String, String)],
    ) -> Result<Option<i32>> {
        let cmd_str = format_command(command, args);

        if self.debug {
            debug!("Running command: {}", cmd_str);
            if !env_vars.is_empty() {
                debug!("Environment variables: {:?}", env_vars);
            }
        } else {
            info!("+ {}", cmd_str);
        }

        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let status = cmd.status().map_err(|e| spawn_error(command, &cmd_str, &e))?;
        debug!("Command exited with: {:?}", status.code());
        Ok(status.code())
    }

    /// Run a command and capture its output.
    ///
    /// Unlike [`run_command`](Self::run_command) a non-zero exit is not an
    /// error; callers inspect [`ProcessResult::success`] themselves.
    #[instrument(skip(self))]
    pub fn run_command_with_output(&self, command: &str, args: &[&str]) -> Result<ProcessResult> {
        let cmd_str = format_command(command, args);

        debug!("Running command with output capture: {}", cmd_str);

        let output = Command::new(command)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| spawn_error(command, &cmd_str, &e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let success = output.status.success();
        let exit_code = output.status.code();

        debug!(
            "Command finished: success={}, exit_code={:?}, stdout_len={}, stderr_len={}",
            success,
            exit_code,
            stdout.len(),
            stderr.len()
        );

        if !success && !stderr.is_empty() {
            debug!("Command stderr: {}", stderr.trim_end());
        }

        Ok(ProcessResult {
            exit_code,
            stdout,
            stderr,
            success,
        })
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

fn format_command(command: &str, args: &[&str]) -> String {
    format!("{} {}", command, args.join(" "))
}

fn spawn_error(command: &str, cmd_str: &str, err: &io::Error) -> RunnerError {
    if err.kind() == io::ErrorKind::NotFound {
        error!("Command not found: {}", command);
        error!("Make sure AutoPkg is installed and in PATH");
        return RunnerError::command_not_found(command);
    }

    RunnerError::process(
        cmd_str,
        None,
        String::new(),
        format!("Failed to execute command: {err}"),
    )
}
