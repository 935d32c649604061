use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Output, Stdio};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ExecutionError;

/// Where and with which extra environment a command runs
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    pub working_dir: Option<PathBuf>,
    pub env: HashMap<String, String>,
}

/// Raw outcome of one subprocess run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exited_successfully: bool,
    pub stdout: String,
    pub stderr: String,
    status: ExitStatus,
}

impl From<Output> for ExecutionResult {
    fn from(output: Output) -> Self {
        Self {
            exited_successfully: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            status: output.status,
        }
    }
}

impl ExecutionResult {
    /// Fold the run into its usable output.
    ///
    /// stderr on a successful run is only a warning. A failed run that still
    /// printed something to stdout counts as a success; only a failed run
    /// with empty stdout is an error.
    pub fn into_output(self) -> Result<String, ExecutionError> {
        if self.exited_successfully {
            if !self.stderr.is_empty() {
                warn!(stderr = %self.stderr, "command wrote to stderr");
            }
            return Ok(self.stdout);
        }

        if !self.stdout.is_empty() {
            warn!(
                status = %self.status,
                stderr = %self.stderr,
                "command failed but produced output, returning it"
            );
            return Ok(self.stdout);
        }

        Err(ExecutionError::Failed {
            status: self.status,
            stderr: self.stderr,
        })
    }
}

/// Run a prepared command with the given execution context
pub async fn run_command(
    mut cmd: Command,
    ctx: &ExecutionContext,
) -> Result<String, ExecutionError> {
    if let Some(ref dir) = ctx.working_dir {
        // Otherwise indistinguishable from a missing program
        if !dir.is_dir() {
            return Err(ExecutionError::MissingWorkingDir(dir.clone()));
        }
        cmd.current_dir(dir);
    }
    cmd.envs(&ctx.env);
    // stdin belongs to the MCP transport
    cmd.stdin(Stdio::null());

    debug!(command = ?cmd.as_std(), "executing");
    let output = cmd.output().await.map_err(ExecutionError::Spawn)?;
    let result = ExecutionResult::from(output);
    debug!(success = result.exited_successfully, stdout = %result.stdout, "command finished");
    result.into_output()
}

/// Run a full shell command line through `sh -c`. The line is not inspected.
pub async fn run_shell(command_line: &str, ctx: &ExecutionContext) -> Result<String, ExecutionError> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    run_command(cmd, ctx).await
}
