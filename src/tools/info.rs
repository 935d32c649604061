use std::path::PathBuf;

use serde::Serialize;

use crate::config::ServerConfig;

/// Paths of the installation and whether the pieces the CLI needs are present
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationReport {
    pub webhare_dir: PathBuf,
    pub webhare_data_root: PathBuf,
    pub webhare_exists: bool,
    pub webhare_cli_exists: bool,
    pub webhare_functions_exists: bool,
    pub webhare_data_root_exists: bool,
    pub home: PathBuf,
}

impl InstallationReport {
    pub fn inspect(config: &ServerConfig) -> Self {
        Self {
            webhare_dir: config.webhare_dir.clone(),
            webhare_data_root: config.data_root.clone(),
            webhare_exists: config.webhare_dir.exists(),
            webhare_cli_exists: config.cli_path().exists(),
            webhare_functions_exists: config.functions_path().exists(),
            webhare_data_root_exists: config.data_root.exists(),
            home: config.home.clone(),
        }
    }

    /// Installed means the tree and its `bin/wh` are both there
    pub fn is_installed(&self) -> bool {
        self.webhare_exists && self.webhare_cli_exists
    }
}

pub fn execute(config: &ServerConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&InstallationReport::inspect(config))
}
