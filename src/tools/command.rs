use rmcp::schemars;
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::error::DispatchError;
use crate::executor::{run_shell, ExecutionContext};
use crate::request::OutputFilter;

use super::render;

/// Request parameters for the command tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CommandRequest {
    /// Shell command line to execute, run with the WebHare installation as working directory
    pub command: String,

    #[serde(flatten)]
    pub filter: OutputFilter,
}

/// Run the command line inside the installation directory
pub async fn execute(req: &CommandRequest, config: &ServerConfig) -> Result<String, DispatchError> {
    let grep = req.filter.compile().map_err(|e| DispatchError::MalformedArguments {
        operation: "command",
        reason: format!("invalid grep pattern: {}", e),
    })?;

    let ctx = ExecutionContext {
        working_dir: Some(config.webhare_dir.clone()),
        ..Default::default()
    };
    let output = run_shell(&req.command, &ctx).await?;
    Ok(render(output, &req.filter, grep.as_ref()))
}
