use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    ErrorData, RoleServer, ServerHandler,
};
use tracing::debug;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::tools;

const SERVER_INSTRUCTIONS: &str = r#"A thin front-end for the WebHare CLI of a local WebHare installation.

- info: installation paths and which parts exist
- status: whether WebHare is installed and running
- list_modules: installed modules as JSON
- cli: run `wh <command> <args...>` with the WebHare environment set up
- command: run a shell command line inside the installation directory

command and cli accept optional output filters: grep_pattern (invert_grep: true to exclude matches), then head/tail to limit to the first/last N lines."#;

#[derive(Clone)]
pub struct WebHareServer {
    dispatcher: Arc<Dispatcher>,
}

impl WebHareServer {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(config)),
        }
    }
}

impl ServerHandler for WebHareServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = tools::tools();
        debug!(count = tools.len(), "listing tools");
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(tool = %request.name, arguments = ?request.arguments, "call tool request");
        let envelope = self
            .dispatcher
            .dispatch(&request.name, request.arguments)
            .await;
        debug!(?envelope, "call tool response");
        Ok(envelope.into())
    }
}
