use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::DispatchError;
use crate::invoker::CliInvoker;
use crate::tools::{self, cli, command, info, modules, status, JsonObject, Operation, OperationDescriptor};

/// Result of a tool call as seen by the caller: text items plus an error flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub content: Vec<String>,
    pub is_error: bool,
}

impl ResponseEnvelope {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![text.into()],
            is_error: false,
        }
    }

    pub fn error(err: &DispatchError) -> Self {
        Self {
            content: vec![format!("Error: {}", err)],
            is_error: true,
        }
    }
}

impl From<ResponseEnvelope> for CallToolResult {
    fn from(envelope: ResponseEnvelope) -> Self {
        let content = envelope.content.into_iter().map(Content::text).collect();
        if envelope.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

/// Routes a tool call to its handler and turns every outcome into an envelope.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Arc<ServerConfig>,
    invoker: CliInvoker,
}

impl Dispatcher {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            invoker: CliInvoker::new(Arc::clone(&config)),
            config,
        }
    }

    /// Never fails: errors come back as an envelope with `is_error` set.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> ResponseEnvelope {
        info!(tool = name, "tool call");
        match self.try_dispatch(name, arguments).await {
            Ok(text) => {
                debug!(tool = name, %text, "tool call succeeded");
                ResponseEnvelope::text(text)
            }
            Err(err) => {
                warn!(tool = name, error = %err, "tool call failed");
                ResponseEnvelope::error(&err)
            }
        }
    }

    async fn try_dispatch(&self, name: &str, arguments: Option<JsonObject>) -> Result<String, DispatchError> {
        let descriptor =
            tools::lookup(name).ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;

        match descriptor.operation {
            Operation::Info => Ok(info::execute(&self.config)?),
            Operation::Command => {
                let req: command::CommandRequest = parse_arguments(descriptor, arguments)?;
                command::execute(&req, &self.config).await
            }
            Operation::Cli => {
                let req: cli::CliRequest = parse_arguments(descriptor, arguments)?;
                cli::execute(&req, &self.invoker).await
            }
            Operation::ListModules => modules::execute(&self.invoker).await,
            Operation::Status => status::execute(&self.invoker, &self.config).await,
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(
    descriptor: &OperationDescriptor,
    arguments: Option<JsonObject>,
) -> Result<T, DispatchError> {
    serde_json::from_value(Value::Object(arguments.unwrap_or_default())).map_err(|e| {
        DispatchError::MalformedArguments {
            operation: descriptor.name,
            reason: e.to_string(),
        }
    })
}
