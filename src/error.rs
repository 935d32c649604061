use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failure of a subprocess run, either raw or through the WebHare CLI wrapper.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Command execution failed: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Command execution failed: working directory {} does not exist", .0.display())]
    MissingWorkingDir(PathBuf),

    #[error("Command execution failed: {status}{}", stderr_suffix(.stderr))]
    Failed { status: ExitStatus, stderr: String },

    #[error("could not prepare command script: {0}")]
    Script(#[source] std::io::Error),

    /// Anything that went wrong while running `bin/wh` through a transient script.
    #[error("WebHare command execution failed: {0}")]
    Cli(Box<ExecutionError>),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

impl ExecutionError {
    pub fn into_cli(self) -> Self {
        match self {
            ExecutionError::Cli(_) => self,
            other => ExecutionError::Cli(Box::new(other)),
        }
    }
}

/// Everything a tool call can fail with. Rendered to the caller as `Error: <message>`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    #[error("Invalid arguments for {operation}: {reason}")]
    MalformedArguments {
        operation: &'static str,
        reason: String,
    },

    #[error("could not encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME is not set; set HOME or both WEBHARE_DIR and WEBHARE_DATAROOT")]
    MissingHome,

    #[error("WEBHARE_BASEPORT must be a port number, got '{0}'")]
    InvalidPort(String),

    #[error("WEBHARE_MCP_LOG must be 'stderr' or 'file', got '{0}'")]
    InvalidLogMode(String),
}

/// Fatal errors before the transport is up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot install log subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}
