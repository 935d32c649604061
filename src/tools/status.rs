use serde::Serialize;
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::DispatchError;
use crate::invoker::CliInvoker;

use super::info::InstallationReport;

/// `wh` subcommand that succeeds only while WebHare is running
pub const LIVENESS_SUBCOMMAND: &str = "isrunning";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Running,
    Stopped,
    NotInstalled,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    installed: bool,
    running: bool,
    message: &'static str,
}

impl InstallState {
    pub fn is_installed(self) -> bool {
        !matches!(self, InstallState::NotInstalled)
    }

    pub fn is_running(self) -> bool {
        matches!(self, InstallState::Running)
    }

    pub fn message(self) -> &'static str {
        match self {
            InstallState::Running => "WebHare is installed and running",
            InstallState::Stopped => "WebHare is installed but not running",
            InstallState::NotInstalled => "WebHare is not installed",
        }
    }
}

/// Ask the CLI whether WebHare runs; if it cannot tell, look at the disk.
pub async fn check(invoker: &CliInvoker, config: &ServerConfig) -> InstallState {
    match invoker.invoke(LIVENESS_SUBCOMMAND, &[]).await {
        Ok(_) => InstallState::Running,
        Err(err) => {
            debug!(error = %err, "liveness check failed, probing installation");
            if InstallationReport::inspect(config).is_installed() {
                InstallState::Stopped
            } else {
                InstallState::NotInstalled
            }
        }
    }
}

pub async fn execute(invoker: &CliInvoker, config: &ServerConfig) -> Result<String, DispatchError> {
    let state = check(invoker, config).await;
    let report = StatusReport {
        installed: state.is_installed(),
        running: state.is_running(),
        message: state.message(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
