use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use tempfile::{Builder, TempPath};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::{ServerConfig, EXTRA_PATH_DIRS};
use crate::error::ExecutionError;
use crate::executor::{run_command, ExecutionContext};

const SCRIPT_PREFIX: &str = "webhare-command-";

/// Runs `bin/wh` subcommands inside the environment the WebHare CLI expects.
///
/// Every call runs a transient bash script inside the installation with the
/// WebHare variables in its environment; the script extends PATH, sources
/// `lib/wh-functions.sh` and hands over to `bin/wh`. The
/// subcommand and its arguments never appear in the script text: they are
/// passed as argv and forwarded with `"$@"`.
#[derive(Debug, Clone)]
pub struct CliInvoker {
    config: Arc<ServerConfig>,
}

impl CliInvoker {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    pub async fn invoke(&self, subcommand: &str, args: &[String]) -> Result<String, ExecutionError> {
        info!(subcommand, ?args, "running WebHare command");
        let result = self.run_script(subcommand, args).await;
        match &result {
            Ok(output) => debug!(subcommand, %output, "WebHare command finished"),
            Err(err) => warn!(subcommand, error = %err, "WebHare command failed"),
        }
        result.map_err(ExecutionError::into_cli)
    }

    async fn run_script(&self, subcommand: &str, args: &[String]) -> Result<String, ExecutionError> {
        let script = write_script(&self.config.script_dir, &script_body(&self.config))
            .map_err(ExecutionError::Script)?;

        let mut cmd = Command::new("bash");
        cmd.arg(&*script).arg(subcommand).args(args);
        let result = run_command(cmd, &cli_context(&self.config)).await;

        // Dropping the path would also remove it; closing surfaces the error
        let path = script.to_path_buf();
        if let Err(err) = script.close() {
            warn!(path = %path.display(), error = %err, "could not remove command script");
        }
        result
    }
}

/// Write the script to a fresh, uniquely named file and mark it executable.
///
/// The returned path deletes the file when dropped.
fn write_script(dir: &Path, body: &str) -> std::io::Result<TempPath> {
    let mut file = Builder::new()
        .prefix(SCRIPT_PREFIX)
        .suffix(".sh")
        .tempfile_in(dir)?;
    file.write_all(body.as_bytes())?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o755))?;
    }

    // Close the handle before anything executes the file
    Ok(file.into_temp_path())
}

/// Working directory and variables `bin/wh` expects
fn cli_context(config: &ServerConfig) -> ExecutionContext {
    let env = [
        ("HOME", config.home.to_string_lossy().into_owned()),
        ("WEBHARE_DIR", config.webhare_dir.to_string_lossy().into_owned()),
        ("WEBHARE_DATAROOT", config.data_root.to_string_lossy().into_owned()),
        ("WEBHARE_BASEPORT", config.base_port.to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();

    ExecutionContext {
        working_dir: Some(config.webhare_dir.clone()),
        env,
    }
}

fn script_body(config: &ServerConfig) -> String {
    let functions_path = config.functions_path();
    format!(
        r#"#!/bin/bash
export PATH="$PATH:{extra_path}"
source {functions}
./bin/wh "$@"
"#,
        extra_path = EXTRA_PATH_DIRS.join(":"),
        functions = shell_words::quote(&functions_path.to_string_lossy()),
    )
}
