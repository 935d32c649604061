mod config;
mod dispatcher;
mod error;
mod executor;
mod invoker;
mod logging;
mod request;
mod server;
mod tools;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use rmcp::{transport::stdio, ServiceExt};
use tracing::{error, info};

use config::{LogMode, ServerConfig};
use error::StartupError;
use server::WebHareServer;
use tools::info::InstallationReport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = startup()?;

    info!("===== WebHare MCP server starting =====");
    report_installation(&config);

    let service = WebHareServer::new(config)
        .serve(stdio())
        .await
        .inspect_err(|e| error!(error = %e, "server initialization failed"))?;
    info!("WebHare MCP server running on stdio");

    let reason = service.waiting().await?;
    info!(?reason, "WebHare MCP server stopped");
    Ok(())
}

/// Configuration and logging; nothing may be written to stdout before this.
fn startup() -> Result<Arc<ServerConfig>, StartupError> {
    let config = ServerConfig::from_env()?;
    logging::init(&config.log)?;
    Ok(Arc::new(config))
}

fn report_installation(config: &ServerConfig) {
    let report = InstallationReport::inspect(config);
    info!(path = %report.webhare_dir.display(), "using WebHare installation");
    info!(path = %report.webhare_data_root.display(), "using WebHare data root");
    info!(
        installation = report.webhare_exists,
        cli = report.webhare_cli_exists,
        functions = report.webhare_functions_exists,
        data_root = report.webhare_data_root_exists,
        "WebHare installation check"
    );
    if let LogMode::File(path) = &config.log {
        info!(path = %path.display(), "log file");
    }
}
