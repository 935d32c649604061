use rmcp::schemars;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DispatchError;
use crate::invoker::CliInvoker;
use crate::request::OutputFilter;

use super::render;

/// Request parameters for the cli tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CliRequest {
    /// WebHare command to execute, e.g. `getmodulelist` or `isrunning`
    pub command: String,

    /// Command arguments, passed to `wh` one by one without shell interpretation
    #[serde(default, deserialize_with = "lenient_args")]
    #[schemars(with = "Vec<String>")]
    pub args: Vec<String>,

    #[serde(flatten)]
    pub filter: OutputFilter,
}

/// Anything but an array means no arguments; non-string items keep their JSON text.
fn lenient_args<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let args = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(args)
}

pub async fn execute(req: &CliRequest, invoker: &CliInvoker) -> Result<String, DispatchError> {
    let grep = req.filter.compile().map_err(|e| DispatchError::MalformedArguments {
        operation: "cli",
        reason: format!("invalid grep pattern: {}", e),
    })?;

    let output = invoker.invoke(&req.command, &req.args).await?;
    Ok(render(output, &req.filter, grep.as_ref()))
}
